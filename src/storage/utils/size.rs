/// Render a byte count for upload and listing output (1024 base, units B,K,M,G,T).
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
    if size < 1024 {
        return format!("{size}B");
    }
    let mut scaled = size as f64;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{scaled:.1}{}", UNITS[unit])
}
