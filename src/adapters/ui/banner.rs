//! ASCII welcome banner with a gold-to-blue gradient (the academy's
//! palette). Uses the figlet standard font.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Primary gold (#d69e2e).
const GOLD: (u8, u8, u8) = (0xd6, 0x9e, 0x2e);
/// Accent blue (#4a90e2).
const BLUE: (u8, u8, u8) = (0x4a, 0x90, 0xe2);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints "ACADEMY" in figlet standard font with a vertical gold-to-blue
/// gradient, then the version line.
pub fn print_welcome() {
    let mut out = stdout();
    let Ok(font) = FIGfont::standard() else {
        let _ = writeln!(out, "ACADEMY ENROLL");
        return;
    };
    let Some(figure) = font.convert("ACADEMY") else {
        let _ = writeln!(out, "ACADEMY ENROLL");
        return;
    };
    let art = figure.to_string();
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(GOLD, BLUE, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: BLUE.0,
        g: BLUE.1,
        b: BLUE.2,
    }));
    let _ = out.execute(Print(format!(
        "Registration & exam submission desk v{}\r\n",
        version
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp_rgb(GOLD, BLUE, 0.0), GOLD);
        assert_eq!(lerp_rgb(GOLD, BLUE, 1.0), BLUE);
    }
}
