use serde::Serialize;
use std::io::{self, Write};
use wifiplotter_core::{AccessPoint, ScanStatus};

pub fn write_text<W: Write>(out: &mut W, status: &ScanStatus, access_points: &[AccessPoint]) -> io::Result<()> {
    writeln!(out, "~WifiPlotter~")?;
    writeln!(out, "=============\n")?;

    if let ScanStatus::ToolFailed { reason } = status {
        writeln!(out, "Scan tool failed, results may be incomplete: {}\n", reason)?;
    }
    if access_points.is_empty() {
        writeln!(out, "No access points found.")?;
    }

    for ap in access_points {
        write_access_point(out, ap)?;
    }
    Ok(())
}

fn write_access_point<W: Write>(out: &mut W, ap: &AccessPoint) -> io::Result<()> {
    let name = if ap.ssid.is_empty() { "(hidden)" } else { ap.ssid.as_str() };

    writeln!(out, "{}", name)?;
    writeln!(out, "{}", "=".repeat(name.chars().count()))?;
    writeln!(out, "MAC Address:  {}", ap.address)?;
    writeln!(out, "Channel:      {}", ap.channel)?;
    writeln!(out, "Frequency:    {} GHz", ap.frequency)?;
    writeln!(out, "Encryption:   {}", if ap.encryption { "on" } else { "off" })?;
    writeln!(out, "Quality:")?;
    writeln!(out, "  Percent:    {:.1}%", ap.quality.percent)?;
    writeln!(out, "  Signal:     {} dBm\n\n", ap.quality.signal)?;
    Ok(())
}

/// JSON 输出：扫描状态和接入点列表放在一起，失败和"没有找到"可以区分开
#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'a ScanStatus,
    access_points: &'a [AccessPoint],
}

pub fn write_json<W: Write>(out: &mut W, status: &ScanStatus, access_points: &[AccessPoint]) -> io::Result<()> {
    let report = JsonReport {
        status,
        access_points,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}
