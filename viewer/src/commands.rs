use anyhow::Result;

/// One line of interactive input
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Minutes since midnight, or -1
    Slider(i32),
    Zoom(f64),
    Pan(f64, f64),
    Resize(f64, f64),
    Quit,
}

impl Command {
    /// Blank lines and comments are None
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let cmd = match words.as_slice() {
            [value] if *value == "quit" || *value == "q" => Command::Quit,
            [value] => Command::Slider(
                value
                    .parse()
                    .map_err(|_| anyhow!("Not a slider value: {value:?}"))?,
            ),
            ["time", value] => Command::Slider(value.parse()?),
            ["zoom", z] => Command::Zoom(number(z)?),
            ["pan", lon, lat] => Command::Pan(number(lon)?, number(lat)?),
            ["resize", w, h] => Command::Resize(number(w)?, number(h)?),
            _ => bail!("Unknown command {line:?}"),
        };
        Ok(Some(cmd))
    }
}

// "NaN" and "inf" parse as f64, but no view can use them
fn number(x: &str) -> Result<f64> {
    let value: f64 = x.parse().map_err(|_| anyhow!("Not a number: {x:?}"))?;
    if !value.is_finite() {
        bail!("{x} isn't a finite number");
    }
    Ok(value)
}
