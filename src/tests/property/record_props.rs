//! Property-based tests for lenient record decoding
//!
//! Tests invariants:
//! - A list stored as a stringified JSON array decodes back to the same list
//! - A list stored natively decodes to the same list
//! - Any string in a list field decodes without error

use proptest::prelude::*;
use serde_json::json;

use crate::core::requests::lenient::parse_list;
use crate::core::requests::RequestRecord;

fn arb_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9.+# -]{1,12}", 0..6)
}

proptest! {
    /// Property: lists survive being stringified by the backend
    #[test]
    fn prop_stringified_lists_round_trip(
        technologies in arb_list(),
        languages in arb_list(),
    ) {
        let record: RequestRecord = serde_json::from_value(json!({
            "id": "r-1",
            "technologies": serde_json::to_string(&technologies).unwrap(),
            "communicationLanguages": languages.clone(),
        }))
        .unwrap();

        prop_assert_eq!(&record.technologies, &technologies);
        prop_assert_eq!(&record.communication_languages, &languages);

        // Re-serialized records carry native arrays
        let value = serde_json::to_value(&record).unwrap();
        prop_assert_eq!(&value["technologies"], &json!(technologies));
    }

    /// Property: arbitrary strings never fail to decode
    #[test]
    fn prop_any_string_decodes(
        raw in ".*",
    ) {
        let decoded: Result<RequestRecord, _> = serde_json::from_value(json!({
            "technologies": raw.clone(),
        }));
        prop_assert!(decoded.is_ok());
        prop_assert_eq!(decoded.unwrap().technologies, parse_list(&raw));
    }
}
