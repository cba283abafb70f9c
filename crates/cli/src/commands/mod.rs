pub(crate) mod convert;
pub(crate) mod inspect;

/// Outcome of a subcommand, rendered once by `main` in the chosen format.
#[derive(Debug)]
pub(crate) struct Report {
    pub text: String,
    pub json: serde_json::Value,
}
