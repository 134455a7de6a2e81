pub mod cover_letter;
pub mod filler;
pub mod handlers;
pub mod merge;
pub mod prompts;
pub mod tailor;
