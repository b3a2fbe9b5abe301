use std::collections::HashMap;

/// Query parameters whose presence turns on authentication for the totals endpoint
pub const GATED_PARAMS: [&str; 4] = ["age", "gender", "fromDate", "toDate"];

/// Unfiltered totals are public; any non-empty filter parameter requires a token.
pub fn requires_auth(params: &HashMap<String, String>) -> bool {
    GATED_PARAMS
        .iter()
        .any(|name| params.get(*name).is_some_and(|value| !value.is_empty()))
}
