use std::fmt;

use serde::Deserialize;

use super::error::OrbitError;

const TLE_LINE_LEN: usize = 69;

/// A parsed two-line element set, kept together with the text it came from.
#[derive(Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct OrbitalElementSet {
    title: Option<String>,
    line1: String,
    line2: String,
    elements: sgp4::Elements,
}

impl OrbitalElementSet {
    /// Parse a 2-line or 3-line (titled) TLE block.
    pub fn parse(tle: &str) -> Result<Self, OrbitError> {
        let (title, line1, line2) = parse_tle_lines(tle)?;
        Self::from_lines(title, &line1, &line2)
    }

    pub fn from_lines(title: Option<String>, line1: &str, line2: &str) -> Result<Self, OrbitError> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();
        check_line(line1, '1')?;
        check_line(line2, '2')?;

        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let elements = sgp4::Elements::from_tle(title.clone(), line1.as_bytes(), line2.as_bytes())?;

        Ok(Self {
            title,
            line1: line1.to_string(),
            line2: line2.to_string(),
            elements,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    /// Display name, falling back to the catalog number.
    pub fn name(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", self.elements.norad_id))
    }

    pub fn epoch(&self) -> chrono::NaiveDateTime {
        self.elements.datetime
    }

    pub fn elements(&self) -> &sgp4::Elements {
        &self.elements
    }
}

impl fmt::Debug for OrbitalElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrbitalElementSet")
            .field("title", &self.title)
            .field("line1", &self.line1)
            .field("line2", &self.line2)
            .finish()
    }
}

impl TryFrom<String> for OrbitalElementSet {
    type Error = OrbitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

pub fn parse_tle_lines(tle: &str) -> Result<(Option<String>, String, String), OrbitError> {
    let lines: Vec<String> = tle
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    match lines.len() {
        2 => Ok((None, lines[0].clone(), lines[1].clone())),
        3 => Ok((Some(lines[0].clone()), lines[1].clone(), lines[2].clone())),
        n => Err(OrbitError::InvalidTleFormat(format!(
            "expected 2 or 3 lines, got {}",
            n
        ))),
    }
}

/// Split catalog text holding any number of 2- or 3-line entries.
///
/// Lines that do not belong to an entry are skipped; entries that fail
/// validation are returned as errors in place.
pub fn parse_catalog(text: &str) -> Vec<Result<OrbitalElementSet, OrbitError>> {
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut sets = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            sets.push(OrbitalElementSet::from_lines(None, lines[i], lines[i + 1]));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            sets.push(OrbitalElementSet::from_lines(
                Some(lines[i].to_string()),
                lines[i + 1],
                lines[i + 2],
            ));
            i += 3;
        } else {
            log::debug!("skipping stray catalog line: {}", lines[i]);
            i += 1;
        }
    }
    sets
}

fn check_line(line: &str, number: char) -> Result<(), OrbitError> {
    if !line.is_ascii() || line.len() != TLE_LINE_LEN {
        return Err(OrbitError::InvalidTleFormat(format!(
            "line {} must be {} ascii characters",
            number, TLE_LINE_LEN
        )));
    }
    let mut chars = line.chars();
    if chars.next() != Some(number) || chars.next() != Some(' ') {
        return Err(OrbitError::InvalidTleFormat(format!(
            "line {} must start with '{} '",
            number, number
        )));
    }

    let expected = checksum(&line[..TLE_LINE_LEN - 1]);
    let found = line[TLE_LINE_LEN - 1..].parse::<u32>().ok();
    if found != Some(expected) {
        return Err(OrbitError::InvalidTleFormat(format!(
            "line {} checksum mismatch (expected {})",
            number, expected
        )));
    }
    Ok(())
}

/// Modulo-10 sum of digits, with '-' counting as one.
fn checksum(data: &str) -> u32 {
    data.chars()
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum::<u32>()
        % 10
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   18268.52547184  .00016717  00000-0  10270-3 0  9019";
    const ISS_LINE2: &str =
        "2 25544  51.6373 238.6885 0003885 206.9748 153.1203 15.53729445 14114";

    #[test]
    fn parses_titled_block() {
        let text = format!("ISS (ZARYA)\n{}\n{}\n", ISS_LINE1, ISS_LINE2);
        let set = OrbitalElementSet::parse(&text).unwrap();
        assert_eq!(set.title(), Some("ISS (ZARYA)"));
        assert_eq!(set.norad_id(), 25544);
        assert_eq!(set.name(), "ISS (ZARYA)");
    }

    #[test]
    fn parses_untitled_block() {
        let text = format!("{}\n{}", ISS_LINE1, ISS_LINE2);
        let set = OrbitalElementSet::parse(&text).unwrap();
        assert_eq!(set.title(), None);
        assert_eq!(set.name(), "NORAD 25544");
    }

    #[test]
    fn rejects_bad_checksum() {
        let corrupted = format!("{}8", &ISS_LINE1[..68]);
        let err = OrbitalElementSet::from_lines(None, &corrupted, ISS_LINE2).unwrap_err();
        assert!(matches!(err, OrbitError::InvalidTleFormat(_)));
    }

    #[test]
    fn rejects_swapped_lines() {
        let err = OrbitalElementSet::from_lines(None, ISS_LINE2, ISS_LINE1).unwrap_err();
        assert!(matches!(err, OrbitError::InvalidTleFormat(_)));
    }

    #[test]
    fn rejects_wrong_line_count() {
        assert!(OrbitalElementSet::parse(ISS_LINE1).is_err());
    }

    #[test]
    fn splits_mixed_catalog() {
        let text = format!(
            "ISS (ZARYA)\n{l1}\n{l2}\n\n{l1}\n{l2}\ntrailing\n",
            l1 = ISS_LINE1,
            l2 = ISS_LINE2
        );
        let sets: Vec<_> = parse_catalog(&text)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].title(), Some("ISS (ZARYA)"));
        assert_eq!(sets[1].title(), None);
    }

    #[test]
    fn checksum_counts_minus_signs() {
        assert_eq!(checksum("1-1"), 3);
    }
}
