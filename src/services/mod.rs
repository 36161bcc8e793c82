pub mod xo_client;

pub use xo_client::{SubmissionOutcome, XoClient};
