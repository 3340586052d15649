use crate::traits::{AccessPoint, Quality, SignalMode};

const SSID_MARKER: &str = "ESSID:\"";
const CHANNEL_MARKER: &str = "Channel:";
const FREQUENCY_MARKER: &str = "Frequency:";
const QUALITY_MARKER: &str = "Quality=";
const SIGNAL_MARKER: &str = " Signal level=";
const ENCRYPTION_MARKER: &str = "Encryption key:";

/// 解析 `iwlist <iface> scan` 的输出
///
/// Every `Cell NN - Address: <mac>` line opens a new record; the field lines
/// that follow (ESSID, Channel, Frequency, Quality, Encryption key) are
/// attached to it until the next cell starts. Records come back in the order
/// their address lines appear.
///
/// Field lines seen before the first cell have nothing to attach to and are
/// skipped. A field that fails to parse is logged and keeps its default, the
/// rest of the report is still read.
pub fn parse_iwlist_output(output: &str, signal_mode: SignalMode) -> Vec<AccessPoint> {
    let mut access_points = Vec::new();
    let mut current: Option<AccessPoint> = None;

    // lines() 同时处理 "\n" 和 "\r\n"
    for (idx, line) in output.lines().enumerate() {
        let line_no = idx + 1;

        if let Some(address) = match_cell_address(line) {
            if let Some(ap) = current.take() {
                access_points.push(ap);
            }
            current = Some(AccessPoint {
                address: address.to_string(),
                ..Default::default()
            });
        }

        let Some(ap) = current.as_mut() else {
            if is_field_line(line) {
                tracing::debug!(line_no, "Ignoring field line before first cell: {}", line.trim());
            }
            continue;
        };

        if let Some(rest) = after_marker(line, SSID_MARKER) {
            ap.ssid = parse_ssid(rest).to_string();
        }

        if let Some(rest) = after_marker(line, CHANNEL_MARKER) {
            match rest.trim().parse::<u32>() {
                Ok(channel) => ap.channel = channel,
                Err(e) => tracing::warn!(line_no, "Failed to parse channel {:?}: {}", rest.trim(), e),
            }
        }

        if let Some(rest) = after_marker(line, FREQUENCY_MARKER) {
            let token = leading_float(rest);
            match token.parse::<f32>() {
                Ok(frequency) => ap.frequency = frequency,
                Err(e) => tracing::warn!(line_no, "Failed to parse frequency {:?}: {}", rest.trim(), e),
            }
        }

        if let Some(rest) = after_marker(line, QUALITY_MARKER) {
            ap.quality = parse_quality(rest, signal_mode, line_no);
        }

        if let Some(rest) = after_marker(line, ENCRYPTION_MARKER) {
            ap.encryption = rest.trim().eq_ignore_ascii_case("on");
        }
    }

    if let Some(ap) = current.take() {
        access_points.push(ap);
    }

    access_points
}

/// Matches `Cell NN - Address: ` (NN being two digits) anywhere in the line
/// and returns everything after it, untrimmed.
pub(super) fn match_cell_address(line: &str) -> Option<&str> {
    const PREFIX: &str = "Cell ";
    const SUFFIX: &str = " - Address: ";

    let mut search_from = 0;
    while let Some(pos) = line[search_from..].find(PREFIX) {
        let start = search_from + pos + PREFIX.len();
        let tail = &line[start..];
        let bs = tail.as_bytes();
        if bs.len() >= 2 && bs[0].is_ascii_digit() && bs[1].is_ascii_digit() {
            if let Some(address) = tail[2..].strip_prefix(SUFFIX) {
                return Some(address);
            }
        }
        search_from = start;
    }
    None
}

fn after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|i| &line[i + marker.len()..])
}

fn is_field_line(line: &str) -> bool {
    [SSID_MARKER, CHANNEL_MARKER, FREQUENCY_MARKER, QUALITY_MARKER, ENCRYPTION_MARKER]
        .iter()
        .any(|m| line.contains(m))
}

/// `MyNetwork"` -> `MyNetwork`. Only the closing quote is dropped, anything
/// inside the quotes (including spaces) is kept.
fn parse_ssid(rest: &str) -> &str {
    let rest = rest.trim_end();
    rest.strip_suffix('"').unwrap_or(rest)
}

/// Longest prefix made of digits and dots: `2.437 GHz (Channel 6)` -> `2.437`.
fn leading_float(s: &str) -> &str {
    let s = s.trim_start();
    let end = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    &s[..end]
}

/// Byte range of the first run of ASCII digits in `s`.
fn digit_run(s: &str) -> Option<(usize, usize)> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let end = s[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |n| start + n);
    Some((start, end))
}

/// Position of the first `/` that directly follows a digit, together with
/// the start of that digit run. Same match as the leftmost `[0-9]+/`.
fn find_ratio(s: &str) -> Option<(usize, usize)> {
    let bs = s.as_bytes();
    let slash = bs
        .iter()
        .enumerate()
        .position(|(i, &b)| b == b'/' && i > 0 && bs[i - 1].is_ascii_digit())?;
    let mut start = slash;
    while start > 0 && bs[start - 1].is_ascii_digit() {
        start -= 1;
    }
    Some((start, slash))
}

/// 解析 Quality 行，例如 `70/70  Signal level=-36 dBm`
///
/// The numerator is the first `<digits>/`, the denominator is the number
/// between the `/` and ` Signal level=`. A zero denominator gives 0%.
fn parse_quality(rest: &str, signal_mode: SignalMode, line_no: usize) -> Quality {
    let mut quality = Quality::default();

    let Some((num_start, slash)) = find_ratio(rest) else {
        tracing::warn!(line_no, "No quality ratio in {:?}", rest.trim());
        return quality;
    };
    let after_slash = &rest[slash + 1..];
    let signal_idx = after_slash.find(SIGNAL_MARKER);

    let numerator = rest[num_start..slash].parse::<u32>();
    let denominator_text = match signal_idx {
        Some(i) => after_slash[..i].trim(),
        None => after_slash,
    };
    let denominator = digit_run(denominator_text)
        .filter(|(start, _)| *start == 0)
        .map(|(start, end)| &denominator_text[start..end])
        .unwrap_or(denominator_text)
        .parse::<u32>();

    match (numerator, denominator) {
        (Ok(_), Ok(0)) => {
            tracing::warn!(line_no, "Quality denominator is zero, reporting 0%");
        }
        (Ok(num), Ok(den)) => {
            quality.percent = num as f32 / den as f32 * 100.0;
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(line_no, "Failed to parse quality ratio {:?}: {}", rest.trim(), e);
        }
    }

    let Some(i) = signal_idx else {
        tracing::debug!(line_no, "No signal level on quality line");
        return quality;
    };
    let signal_text = &after_slash[i + SIGNAL_MARKER.len()..];
    match parse_signal(signal_text, signal_mode) {
        Some(Ok(signal)) => quality.signal = signal,
        Some(Err(e)) => tracing::warn!(line_no, "Failed to parse signal level {:?}: {}", signal_text.trim(), e),
        None => tracing::warn!(line_no, "No digits in signal level {:?}", signal_text.trim()),
    }

    quality
}

fn parse_signal(
    s: &str,
    signal_mode: SignalMode,
) -> Option<std::result::Result<i32, std::num::ParseIntError>> {
    let (start, end) = digit_run(s)?;
    let start = match signal_mode {
        SignalMode::Signed if start > 0 && s.as_bytes()[start - 1] == b'-' => start - 1,
        _ => start,
    };
    Some(s[start..end].parse::<i32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `iwlist wlan1 scan` from a Realtek USB dongle, trimmed to three cells.
    const SAMPLE_IWLIST_OUTPUT: &str = "\
wlan1     Scan completed :
          Cell 01 - Address: AA:BB:CC:DD:EE:FF
                    Channel:6
                    Frequency:2.437 GHz (Channel 6)
                    Quality=70/70  Signal level=-36 dBm
                    Encryption key:on
                    ESSID:\"HomeNetwork\"
                    Bit Rates:1 Mb/s; 2 Mb/s; 5.5 Mb/s; 11 Mb/s; 6 Mb/s
                              9 Mb/s; 12 Mb/s; 18 Mb/s
                    Mode:Master
                    IE: IEEE 802.11i/WPA2 Version 1
          Cell 02 - Address: 11:22:33:44:55:66
                    Channel:36
                    Frequency:5.18 GHz (Channel 36)
                    Quality=35/70  Signal level=-75 dBm
                    Encryption key:off
                    ESSID:\"Cafe Guest\"
                    Mode:Master
          Cell 03 - Address: DE:AD:BE:EF:CA:FE
                    Channel:11
                    Frequency:2.462 GHz (Channel 11)
                    Quality=21/70  Signal level=-89 dBm
                    Encryption key:on
                    ESSID:\"\"
";

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn parse_three_cells_in_order() {
        let aps = parse_iwlist_output(SAMPLE_IWLIST_OUTPUT, SignalMode::Signed);
        assert_eq!(aps.len(), 3);

        assert_eq!(aps[0].address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(aps[0].ssid, "HomeNetwork");
        assert_eq!(aps[0].channel, 6);
        assert!(approx(aps[0].frequency, 2.437));
        assert!(approx(aps[0].quality.percent, 100.0));
        assert_eq!(aps[0].quality.signal, -36);
        assert!(aps[0].encryption);

        assert_eq!(aps[1].address, "11:22:33:44:55:66");
        assert_eq!(aps[1].ssid, "Cafe Guest");
        assert_eq!(aps[1].channel, 36);
        assert!(approx(aps[1].frequency, 5.18));
        assert!(approx(aps[1].quality.percent, 50.0));
        assert_eq!(aps[1].quality.signal, -75);
        assert!(!aps[1].encryption);

        // Hidden network
        assert_eq!(aps[2].address, "DE:AD:BE:EF:CA:FE");
        assert_eq!(aps[2].ssid, "");
        assert!(approx(aps[2].quality.percent, 30.0));
    }

    #[test]
    fn address_is_everything_after_prefix() {
        let aps = parse_iwlist_output("Cell 01 - Address: AA:BB:CC:DD:EE:FF", SignalMode::Signed);
        assert_eq!(aps.len(), 1);
        assert_eq!(aps[0].address, "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn address_is_not_trimmed() {
        let aps = parse_iwlist_output("Cell 01 - Address: AA:BB ", SignalMode::Signed);
        assert_eq!(aps[0].address, "AA:BB ");
    }

    #[test]
    fn address_requires_two_digits() {
        assert_eq!(match_cell_address("Cell 1 - Address: AA"), None);
        assert_eq!(match_cell_address("Cell 123 - Address: AA"), None);
        assert_eq!(match_cell_address("  Cell 42 - Address: AA"), Some("AA"));
        assert_eq!(match_cell_address("Cell x Cell 07 - Address: BB"), Some("BB"));
    }

    #[test]
    fn single_field_lines() {
        let report = "\
Cell 01 - Address: AA:BB:CC:DD:EE:FF
ESSID:\"MyNetwork\"
          Channel:6
Frequency:2.437 GHz (Channel 6)
";
        let aps = parse_iwlist_output(report, SignalMode::Signed);
        assert_eq!(aps[0].ssid, "MyNetwork");
        assert_eq!(aps[0].channel, 6);
        assert!(approx(aps[0].frequency, 2.437));
    }

    #[test]
    fn legacy_signal_drops_the_sign() {
        let report = "Cell 01 - Address: AA\nQuality=70/70  Signal level=-67 dBm";
        let aps = parse_iwlist_output(report, SignalMode::LegacyMagnitude);
        assert!(approx(aps[0].quality.percent, 100.0));
        assert_eq!(aps[0].quality.signal, 67);
    }

    #[test]
    fn signed_signal_keeps_the_sign() {
        let report = "Cell 01 - Address: AA\nQuality=70/70  Signal level=-67 dBm";
        let aps = parse_iwlist_output(report, SignalMode::Signed);
        assert!(approx(aps[0].quality.percent, 100.0));
        assert_eq!(aps[0].quality.signal, -67);
    }

    #[test]
    fn relative_signal_levels() {
        let report = "Cell 01 - Address: AA\nQuality=60/100  Signal level=60/100";
        let aps = parse_iwlist_output(report, SignalMode::Signed);
        assert!(approx(aps[0].quality.percent, 60.0));
        assert_eq!(aps[0].quality.signal, 60);
    }

    #[test]
    fn zero_denominator_reports_zero_percent() {
        let report = "Cell 01 - Address: AA\nQuality=0/0  Signal level=-90 dBm";
        let aps = parse_iwlist_output(report, SignalMode::Signed);
        assert_eq!(aps[0].quality.percent, 0.0);
        assert_eq!(aps[0].quality.signal, -90);
    }

    #[test]
    fn bad_numbers_keep_defaults() {
        let report = "\
Cell 01 - Address: AA
Channel:six
Frequency:unknown
Quality=bad  Signal level=?
ESSID:\"StillParsed\"
";
        let aps = parse_iwlist_output(report, SignalMode::Signed);
        assert_eq!(aps.len(), 1);
        assert_eq!(aps[0].channel, 0);
        assert_eq!(aps[0].frequency, 0.0);
        assert_eq!(aps[0].quality, Quality::default());
        assert_eq!(aps[0].ssid, "StillParsed");
    }

    #[test]
    fn fields_before_first_cell_are_ignored() {
        let report = "\
ESSID:\"Orphan\"
Channel:3
Quality=10/70  Signal level=-80 dBm
Cell 01 - Address: AA
ESSID:\"Owned\"
";
        let aps = parse_iwlist_output(report, SignalMode::Signed);
        assert_eq!(aps.len(), 1);
        assert_eq!(aps[0].ssid, "Owned");
        assert_eq!(aps[0].channel, 0);
        assert_eq!(aps[0].quality, Quality::default());
    }

    #[test]
    fn crlf_line_endings() {
        let report = "Cell 01 - Address: AA:BB\r\nESSID:\"Net\"\r\nChannel:11\r\n";
        let aps = parse_iwlist_output(report, SignalMode::Signed);
        assert_eq!(aps[0].address, "AA:BB");
        assert_eq!(aps[0].ssid, "Net");
        assert_eq!(aps[0].channel, 11);
    }

    #[test]
    fn empty_and_garbage_input() {
        assert!(parse_iwlist_output("", SignalMode::Signed).is_empty());
        assert!(parse_iwlist_output("wlan1     No scan results\n\n", SignalMode::Signed).is_empty());
        assert!(parse_iwlist_output("\u{0}\u{1}garbage/// Quality=", SignalMode::Signed).is_empty());
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = parse_iwlist_output(SAMPLE_IWLIST_OUTPUT, SignalMode::Signed);
        let second = parse_iwlist_output(SAMPLE_IWLIST_OUTPUT, SignalMode::Signed);
        assert_eq!(first, second);
    }

    #[test]
    fn single_space_before_signal_marker() {
        let report = "Cell 01 - Address: AA\nQuality=42/70 Signal level=-58 dBm";
        let aps = parse_iwlist_output(report, SignalMode::Signed);
        assert!(approx(aps[0].quality.percent, 60.0));
        assert_eq!(aps[0].quality.signal, -58);
    }

    #[test]
    fn leading_float_token() {
        assert_eq!(leading_float("2.437 GHz (Channel 6)"), "2.437");
        assert_eq!(leading_float(" 5.18 GHz"), "5.18");
        assert_eq!(leading_float("GHz"), "");
    }
}
