/// Strip a single trailing dot.
pub fn unfqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Turn a record name into the zone-relative label providers expect.
///
/// `name` may be fully qualified or already relative. A name equal to the
/// zone becomes the empty string (the zone apex).
pub fn normalize_record_name(name: &str, zone: &str) -> String {
    let name = unfqdn(name);
    let zone = unfqdn(zone);
    let relative = name.strip_suffix(zone).unwrap_or(name);
    unfqdn(relative).to_string()
}
