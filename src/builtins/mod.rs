pub mod cd;
pub mod history;
pub mod jobs;
