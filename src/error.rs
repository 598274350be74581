use reqwest::StatusCode;

/// Failure kinds for one card extraction.
///
/// Required-field failures are fatal to the extraction they occur in; callers
/// decide whether to skip, log, or retry at their own layer. Optional-field
/// absence is not represented here at all.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The URL carries no multiverseid parameter. Raised before any markup
    /// is parsed.
    #[error("no multiverseid parameter in '{url}'")]
    MissingIdentifier { url: String },

    /// A required labeled block is missing from the page markup.
    #[error("card page is missing the required '{field}' block")]
    MalformedPage { field: &'static str },

    /// The color indicator block names a color outside the five-entry table.
    #[error("unrecognized color indicator '{value}'")]
    UnknownColorIndicator { value: String },

    /// The fetch collaborator failed in transit; extraction was never attempted.
    #[error("request for {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    /// The card page responded with a non-success status.
    #[error("request for {url} returned {status}")]
    Status { url: String, status: StatusCode },
}
