//! Tracker-database data types.

use serde::Deserialize;

/// A tracked machine row in the database.
///
/// `machine_id` is the mirrored platform machine ID and the join key between
/// the two systems; it is unique per row, which the deduplication filter and
/// the reconciliation pass both rely on.
#[derive(Debug, Clone)]
pub struct TrackedRow {
    /// Opaque page ID assigned by the database.
    pub page_id: String,
    /// Mirrored machine ID.
    pub machine_id: u64,
    /// Machine name, from the row's title property.
    pub name: String,
}

/// Response envelope of a database query.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub results: Vec<Page>,
}

/// A page as returned by the database query, with its raw property map.
#[derive(Debug, Deserialize)]
pub(crate) struct Page {
    pub id: String,
    pub properties: serde_json::Value,
}

impl Page {
    /// Extract a [`TrackedRow`] from the page's property map.
    ///
    /// Returns `None` when the `ID` number property is missing, which only
    /// happens for rows this tool did not create.
    pub(crate) fn to_tracked_row(&self) -> Option<TrackedRow> {
        let machine_id = self
            .properties
            .get("ID")?
            .get("number")?
            .as_u64()?;

        let name = self
            .properties
            .get("Box")
            .and_then(|p| p.get("title"))
            .and_then(|t| t.as_array())
            .and_then(|parts| parts.first())
            .and_then(|part| part.pointer("/text/content"))
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();

        Some(TrackedRow {
            page_id: self.id.clone(),
            machine_id,
            name,
        })
    }
}

/// Response envelope of a page create.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedPage {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_to_tracked_row_extracts_id_and_title() {
        let page: Page = serde_json::from_str(
            r#"{
                "id": "abc-123",
                "properties": {
                    "ID": {"number": 551},
                    "Box": {"title": [{"text": {"content": "Sau"}}]}
                }
            }"#,
        )
        .unwrap();

        let row = page.to_tracked_row().expect("tracked row");
        assert_eq!(row.page_id, "abc-123");
        assert_eq!(row.machine_id, 551);
        assert_eq!(row.name, "Sau");
    }

    #[test]
    fn page_without_numeric_id_is_skipped() {
        let page: Page = serde_json::from_str(
            r#"{
                "id": "abc-123",
                "properties": {
                    "ID": {"number": null},
                    "Box": {"title": []}
                }
            }"#,
        )
        .unwrap();

        assert!(page.to_tracked_row().is_none());
    }

    #[test]
    fn page_with_empty_title_still_tracks() {
        let page: Page = serde_json::from_str(
            r#"{"id": "p1", "properties": {"ID": {"number": 7}, "Box": {"title": []}}}"#,
        )
        .unwrap();

        let row = page.to_tracked_row().expect("tracked row");
        assert_eq!(row.machine_id, 7);
        assert_eq!(row.name, "");
    }
}
