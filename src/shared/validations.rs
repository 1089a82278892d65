use crate::shared::PageRequest;

/// Resolve optional page parameters against the configured defaults.
pub fn validate_pagination(
    page: Option<u32>,
    page_size: Option<u32>,
    default_page_size: u32,
    max_page_size: u32,
) -> PageRequest {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size
        .unwrap_or(default_page_size)
        .clamp(1, max_page_size.max(1));
    PageRequest::new(page, page_size)
}

/// Trimmed, non-empty text or `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(validate_pagination(None, None, 10, 100), PageRequest::new(1, 10));
        assert_eq!(
            validate_pagination(Some(0), Some(500), 10, 100),
            PageRequest::new(1, 100)
        );
    }

    #[test]
    fn blank_strings_become_none() {
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(Some(" Tehran ".into())), Some("Tehran".into()));
        assert_eq!(non_blank(None), None);
    }
}
