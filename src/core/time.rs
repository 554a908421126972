use time::{format_description::well_known::Rfc3339, OffsetDateTime, UtcOffset};

/// All timestamps in this service are UTC. The key-value store only holds
/// RFC 3339 strings, so every value is normalized here before crossing
/// that boundary in either direction.
pub(crate) fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub(crate) fn format_timestamp(value: OffsetDateTime) -> String {
    let utc = value.to_offset(UtcOffset::UTC);
    utc.format(&Rfc3339).unwrap_or_else(|_| utc.to_string())
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok().map(|value| value.to_offset(UtcOffset::UTC))
}
