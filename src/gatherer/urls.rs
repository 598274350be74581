use regex::Regex;

use crate::error::ScrapeError;

const IMAGE_HANDLER: &str = "https://gatherer.wizards.com/Handlers/Image.ashx";

/// First contiguous digit run following the multiverseid key in the card URL.
pub(super) fn multiverse_id(url: &str) -> Result<u64, ScrapeError> {
    let id_re = Regex::new(r"multiverseid=(\d+)").unwrap();
    id_re
        .captures(url)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| ScrapeError::MissingIdentifier {
            url: url.to_string(),
        })
}

pub(super) fn image_url(multiverse_id: u64) -> String {
    format!("{IMAGE_HANDLER}?multiverseid={multiverse_id}&type=card")
}
