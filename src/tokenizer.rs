/// Splits an already trimmed line into its whitespace separated words.
/// There is no quoting or escaping, every run of whitespace is a separator.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

/// A tokenized input line, ready to be dispatched or launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Arguments passed to the program, without the background marker
    pub argv: Vec<String>,
    /// The words as the user typed them, joined by single spaces
    pub display: String,
    pub background: bool,
}

impl CommandLine {
    /// A trailing `&`, either as its own word or glued to the last one,
    /// sends the command to the background.
    pub fn parse(line: &str) -> CommandLine {
        let words = tokenize(line);
        let display = words.join(" ");
        let mut argv = words;
        let mut background = false;

        if let Some(last) = argv.last_mut() {
            if last == "&" {
                argv.pop();
                background = true;
            } else if let Some(stripped) = last.strip_suffix('&') {
                *last = stripped.to_owned();
                background = true;
            }
        }

        CommandLine {
            argv,
            display,
            background,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}
