/// A user-facing message: the key looked up in a language's `messages.json`
/// and the canonical English template used when no translation exists.
///
/// Templates use `{name}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalMessage {
    pub key: &'static str,
    pub template: &'static str,
}

/// Placeholders: {exerciseId}
pub const EXERCISE_NOT_FOUND: CanonicalMessage = CanonicalMessage {
    key: "exercise_not_found",
    template: "exercise {exerciseId} not found.",
};

/// Placeholders: {path}
pub const ROUTE_NOT_FOUND: CanonicalMessage = CanonicalMessage {
    key: "route_not_found",
    template: "Route {path} not found.",
};

pub const DATA_UNAVAILABLE: CanonicalMessage = CanonicalMessage {
    key: "data_unavailable",
    template: "database not working",
};

/// Placeholders: {param}
pub const MISSING_QUERY_PARAM: CanonicalMessage = CanonicalMessage {
    key: "missing_query_param",
    template: "Query parameter '{param}' is required.",
};

pub const ALL: [CanonicalMessage; 4] = [
    EXERCISE_NOT_FOUND,
    ROUTE_NOT_FOUND,
    DATA_UNAVAILABLE,
    MISSING_QUERY_PARAM,
];
