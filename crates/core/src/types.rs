/// Opaque, stable identifier of a performance entry.
///
/// Seeded entries carry short fixture ids (`"1"`, `"2"`); entries added in
/// the editor get a UUID v4 string.
pub type PerformanceId = String;

/// Identifier of a concert.
pub type ConcertId = String;

/// Duration in whole minutes. `0` means "unset" on a performance entry.
pub type Minutes = u32;
