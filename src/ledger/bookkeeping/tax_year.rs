use time::OffsetDateTime;

/// True if `timestamp` falls within [Jan 1 00:00:00, next Jan 1 00:00:00)
/// of `tax_year`, on the wall clock of the timestamp's own offset.
pub fn is_target_tax_year(timestamp: &OffsetDateTime, tax_year: i32) -> bool {
    timestamp.year() == tax_year
}
