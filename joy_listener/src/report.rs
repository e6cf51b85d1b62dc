//! Turns joystick samples into the lines the listener prints.

use crate::msgs::sensor_msgs::Joy;
use std::fmt;
use std::io::{self, Write};

/// Significant digits a default-configured C++ output stream uses for floats.
const STREAM_PRECISION: usize = 6;

/// Displays a float the way `std::cout << value` does out of the box (`%g`, six
/// significant digits), so `-1.0` prints as `-1` and `1e-7` as `1e-07`.
#[derive(Debug, Clone, Copy)]
pub struct StreamFloat(pub f32);

impl fmt::Display for StreamFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = f64::from(self.0);
        if value.is_nan() {
            return f.write_str(if value.is_sign_negative() { "-nan" } else { "nan" });
        }
        if value.is_infinite() {
            return f.write_str(if value < 0.0 { "-inf" } else { "inf" });
        }

        // The exponent after rounding to the target precision picks the notation
        let scientific = format!("{:.*e}", STREAM_PRECISION - 1, value);
        let (mantissa, exponent) = scientific.split_once('e').ok_or(fmt::Error)?;
        let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

        if exponent < -4 || exponent >= STREAM_PRECISION as i32 {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(
                f,
                "{}e{}{:02}",
                trim_fraction(mantissa),
                sign,
                exponent.unsigned_abs()
            )
        } else {
            let decimals = (STREAM_PRECISION as i32 - 1 - exponent) as usize;
            f.write_str(trim_fraction(&format!("{value:.decimals$}")))
        }
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// The subscription callback: writes every axis then every button of a sample.
pub struct JoyPrinter<W: Write> {
    out: W,
}

impl<W: Write> JoyPrinter<W> {
    pub fn new(out: W) -> Self {
        JoyPrinter { out }
    }

    /// Prints `axis i: <value>` for each axis followed by `button i: <value>` for
    /// each button, then flushes. An empty sample writes nothing.
    pub fn print(&mut self, msg: &Joy) -> io::Result<()> {
        for (i, axis) in msg.axes.iter().enumerate() {
            writeln!(self.out, "axis {i}: {}", StreamFloat(*axis))?;
        }
        for (i, button) in msg.buttons.iter().enumerate() {
            writeln!(self.out, "button {i}: {button}")?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn show(value: f32) -> String {
        StreamFloat(value).to_string()
    }

    fn printed(msg: &Joy) -> String {
        let mut printer = JoyPrinter::new(Vec::new());
        printer.print(msg).unwrap();
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test_log::test]
    fn prints_axes_then_buttons() {
        let msg = Joy {
            axes: vec![0.5, -1.0],
            buttons: vec![1, 0],
            ..Default::default()
        };
        assert_eq!(
            printed(&msg),
            "axis 0: 0.5\naxis 1: -1\nbutton 0: 1\nbutton 1: 0\n"
        );
    }

    #[test_log::test]
    fn empty_sample_prints_nothing() {
        assert_eq!(printed(&Joy::default()), "");
    }

    #[test_log::test]
    fn indices_are_contiguous_per_array() {
        let msg = Joy {
            axes: vec![0.0; 3],
            buttons: vec![0; 12],
            ..Default::default()
        };
        let out = printed(&msg);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 15);
        for (i, line) in lines[..3].iter().enumerate() {
            assert_eq!(*line, format!("axis {i}: 0"));
        }
        for (i, line) in lines[3..].iter().enumerate() {
            assert_eq!(*line, format!("button {i}: 0"));
        }
    }

    #[test_log::test]
    fn buttons_only() {
        let msg = Joy {
            buttons: vec![0, 1, -1],
            ..Default::default()
        };
        assert_eq!(printed(&msg), "button 0: 0\nbutton 1: 1\nbutton 2: -1\n");
    }

    #[test_log::test]
    fn float_matches_stream_defaults() {
        assert_eq!(show(0.5), "0.5");
        assert_eq!(show(-1.0), "-1");
        assert_eq!(show(0.0), "0");
        assert_eq!(show(-0.0), "-0");
        assert_eq!(show(0.1), "0.1");
        assert_eq!(show(-0.25), "-0.25");
        assert_eq!(show(0.123_456_79), "0.123457");
        assert_eq!(show(100_000.0), "100000");
        assert_eq!(show(1_000_000.0), "1e+06");
        assert_eq!(show(123_456_789.0), "1.23457e+08");
        assert_eq!(show(0.0001), "0.0001");
        assert_eq!(show(0.00001), "1e-05");
        assert_eq!(show(1e-7), "1e-07");
        assert_eq!(show(-3.5e-12), "-3.5e-12");
    }

    #[test_log::test]
    fn float_non_finite() {
        assert_eq!(show(f32::NAN), "nan");
        assert_eq!(show(f32::INFINITY), "inf");
        assert_eq!(show(f32::NEG_INFINITY), "-inf");
    }
}
