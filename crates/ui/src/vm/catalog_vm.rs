use quiz_core::gate::{AccessGate, CatalogItem};
use quiz_core::model::{SignInRecord, TestSetName};
use services::CatalogService;

use crate::views::ViewError;

/// # Errors
///
/// Returns `ViewError::ListTests` if the test-set listing cannot be fetched.
pub async fn load_catalog(catalog: &CatalogService) -> Result<Vec<TestSetName>, ViewError> {
    catalog.discover_test_sets().await.map_err(|err| {
        tracing::warn!(error = %err, "catalog listing failed");
        ViewError::ListTests
    })
}

#[must_use]
pub fn catalog_items(gate: AccessGate, names: &[TestSetName], signed_in: bool) -> Vec<CatalogItem> {
    gate.decorate(names, signed_in)
}

#[must_use]
pub fn item_class(item: &CatalogItem) -> &'static str {
    if item.locked {
        "test-link locked"
    } else {
        "test-link"
    }
}

/// Text for the signed-in user area.
#[must_use]
pub fn signed_in_label(record: &SignInRecord) -> String {
    let name = record.display_name();
    if name.is_empty() {
        "Signed in".to_string()
    } else {
        format!("Signed in as {name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_items_get_locked_class() {
        let names: Vec<TestSetName> = ["a.json", "b.json"].into_iter().map(TestSetName::from).collect();
        let items = catalog_items(AccessGate::new(1), &names, false);
        assert_eq!(item_class(&items[0]), "test-link");
        assert_eq!(item_class(&items[1]), "test-link locked");
    }

    #[test]
    fn empty_record_still_reads_as_signed_in() {
        assert_eq!(signed_in_label(&SignInRecord::default()), "Signed in");
        let record = SignInRecord {
            name: "Ada".into(),
            ..SignInRecord::default()
        };
        assert_eq!(signed_in_label(&record), "Signed in as Ada");
    }
}
