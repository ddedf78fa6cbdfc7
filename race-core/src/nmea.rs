//! NMEA 0183 position/velocity sentences: RMC (position + speed) and GGA
//! (position only), from GPS (`$GP`) or multi-constellation (`$GN`) talkers.
//!
//! Parsing borrows fields straight out of the line, nothing is copied or
//! modified. Checksums are not verified; the `*hh` suffix is only cut off.

use heapless::Vec;

use crate::config::{KNOTS_TO_KMH, MAX_FIELDS};
use crate::coord::{parse_or_zero, to_decimal_degrees};
use crate::geo::Position;

/// Fields required before an RMC is read: ID … course (index 8).
const RMC_MIN_FIELDS: usize = 9;
/// Fields required before a GGA is read: ID … fix quality (index 6).
const GGA_MIN_FIELDS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Talker {
    /// `$GP`: GPS only
    Gps,
    /// `$GN`: combined GNSS solution
    Gnss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SentenceKind {
    /// Recommended minimum data: position, speed, course
    Rmc,
    /// Fix data: position, quality, satellites
    Gga,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejected {
    /// Not valid UTF-8.
    NotText,
    /// Not one of the recognised `$xxRMC` / `$xxGGA` headers.
    Unrecognized,
    /// Header recognised but the field list is too short to read.
    TooFewFields { kind: SentenceKind, found: usize },
    /// Receiver reports no valid fix (RMC status `V`, GGA quality 0 …).
    NoFix { kind: SentenceKind },
}

impl Rejected {
    /// Sentence type, when the header got that far.
    pub fn kind(&self) -> Option<SentenceKind> {
        match self {
            Rejected::TooFewFields { kind, .. } | Rejected::NoFix { kind } => Some(*kind),
            Rejected::NotText | Rejected::Unrecognized => None,
        }
    }
}

/// Angle field as sent (`DDDMM.MMMM`) plus its hemisphere letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawCoordinate<'a> {
    pub magnitude: &'a str,
    pub hemisphere: char,
}

impl RawCoordinate<'_> {
    pub fn degrees(&self) -> f64 {
        to_decimal_degrees(self.magnitude, self.hemisphere)
    }
}

/// A valid fix, borrowing from the sentence it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fix<'a> {
    pub talker: Talker,
    pub kind: SentenceKind,
    pub latitude: RawCoordinate<'a>,
    pub longitude: RawCoordinate<'a>,
    /// Speed over ground; `None` for position-only sentences.
    pub speed_knots: Option<f64>,
}

impl Fix<'_> {
    pub fn position(&self) -> Position {
        Position::new(self.latitude.degrees(), self.longitude.degrees())
    }

    pub fn speed_kmh(&self) -> Option<f64> {
        self.speed_knots.map(|knots| knots * KNOTS_TO_KMH)
    }
}

/// Parse one sentence (CR/LF already stripped).
pub fn parse(raw: &str) -> Result<Fix<'_>, Rejected> {
    let header = raw.get(..6).ok_or(Rejected::Unrecognized)?;
    let (talker, kind) = classify(header).ok_or(Rejected::Unrecognized)?;
    let fields = split_fields(raw);

    match kind {
        SentenceKind::Rmc => parse_rmc(talker, &fields),
        SentenceKind::Gga => parse_gga(talker, &fields),
    }
}

fn classify(header: &str) -> Option<(Talker, SentenceKind)> {
    let talker = match header.get(..3)? {
        "$GP" => Talker::Gps,
        "$GN" => Talker::Gnss,
        _ => return None,
    };
    let kind = match header.get(3..)? {
        "RMC" => SentenceKind::Rmc,
        "GGA" => SentenceKind::Gga,
        _ => return None,
    };
    Some((talker, kind))
}

/// Comma-separated fields, empties preserved, checksum suffix removed.
/// Fields past [`MAX_FIELDS`] are ignored.
fn split_fields(raw: &str) -> Vec<&str, MAX_FIELDS> {
    let body = raw.split_once('*').map_or(raw, |(body, _checksum)| body);
    let mut fields = Vec::new();
    for field in body.split(',') {
        if fields.push(field).is_err() {
            break;
        }
    }
    fields
}

fn coordinate<'a>(magnitude: &'a str, hemisphere: &str) -> RawCoordinate<'a> {
    RawCoordinate {
        magnitude,
        hemisphere: hemisphere.chars().next().unwrap_or(' '),
    }
}

// $xxRMC,time,status,lat,NS,lon,EW,speed,course,date,…*CS
fn parse_rmc<'a>(talker: Talker, fields: &[&'a str]) -> Result<Fix<'a>, Rejected> {
    let kind = SentenceKind::Rmc;
    if fields.len() < RMC_MIN_FIELDS {
        return Err(Rejected::TooFewFields {
            kind,
            found: fields.len(),
        });
    }
    if fields[2] != "A" {
        return Err(Rejected::NoFix { kind });
    }

    Ok(Fix {
        talker,
        kind,
        latitude: coordinate(fields[3], fields[4]),
        longitude: coordinate(fields[5], fields[6]),
        speed_knots: Some(parse_or_zero(fields[7])),
    })
}

// $xxGGA,time,lat,NS,lon,EW,quality,sats,hdop,alt,M,geoid,M,…*CS
fn parse_gga<'a>(talker: Talker, fields: &[&'a str]) -> Result<Fix<'a>, Rejected> {
    let kind = SentenceKind::Gga;
    if fields.len() < GGA_MIN_FIELDS {
        return Err(Rejected::TooFewFields {
            kind,
            found: fields.len(),
        });
    }
    // 1 = GPS, 2 = DGPS
    if !matches!(fields[6], "1" | "2") {
        return Err(Rejected::NoFix { kind });
    }

    Ok(Fix {
        talker,
        kind,
        latitude: coordinate(fields[2], fields[3]),
        longitude: coordinate(fields[4], fields[5]),
        speed_knots: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RMC: &str = "$GNRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";

    fn close(a: f64, b: f64) -> bool {
        libm::fabs(a - b) < 1e-4
    }

    #[test]
    fn test_parse_rmc() {
        let fix = parse(RMC).unwrap();
        assert_eq!(fix.talker, Talker::Gnss);
        assert_eq!(fix.kind, SentenceKind::Rmc);
        assert_eq!(fix.latitude.magnitude, "4807.038");
        assert_eq!(fix.latitude.hemisphere, 'N');
        assert_eq!(fix.longitude.magnitude, "01131.000");
        assert_eq!(fix.longitude.hemisphere, 'E');
        assert_eq!(fix.speed_knots, Some(22.4));

        let kmh = fix.speed_kmh().unwrap();
        assert!(close(kmh, 41.4848), "got {kmh}");

        let pos = fix.position();
        assert!(close(pos.latitude_deg, 48.1173));
        assert!(close(pos.longitude_deg, 11.5167));
    }

    #[test]
    fn test_gp_talker_is_accepted() {
        let line = RMC.replacen("$GN", "$GP", 1);
        let fix = parse(&line).unwrap();
        assert_eq!(fix.talker, Talker::Gps);
    }

    #[test]
    fn test_parse_gga() {
        let fix = parse(GGA).unwrap();
        assert_eq!(fix.kind, SentenceKind::Gga);
        assert_eq!(fix.speed_knots, None);
        assert_eq!(fix.speed_kmh(), None);
        assert!(close(fix.position().latitude_deg, 48.1173));
    }

    #[test]
    fn test_void_rmc_is_rejected() {
        let line = "$GNRMC,123519,V,,,,,,,230394,,,N*53";
        assert_eq!(
            parse(line),
            Err(Rejected::NoFix {
                kind: SentenceKind::Rmc
            })
        );
    }

    #[test]
    fn test_gga_without_fix_is_rejected() {
        let line = "$GNGGA,123519,,,,,0,00,99.99,,,,,,*56";
        assert_eq!(
            parse(line),
            Err(Rejected::NoFix {
                kind: SentenceKind::Gga
            })
        );
    }

    #[test]
    fn test_short_rmc_is_rejected_before_reading_fields() {
        let line = "$GNRMC,123519,A,4807.038,N";
        let err = parse(line).unwrap_err();
        assert_eq!(
            err,
            Rejected::TooFewFields {
                kind: SentenceKind::Rmc,
                found: 5
            }
        );
        assert_eq!(err.kind(), Some(SentenceKind::Rmc));

        assert!(matches!(
            parse("$GNRMC"),
            Err(Rejected::TooFewFields { found: 1, .. })
        ));
    }

    #[test]
    fn test_other_sentences_are_unrecognized() {
        assert_eq!(parse("$GPGSV,3,1,11,03,03,111,00*74"), Err(Rejected::Unrecognized));
        assert_eq!(parse("$GNVTG,084.4,T,,M,022.4,N,041.5,K,A*2C"), Err(Rejected::Unrecognized));
        assert_eq!(parse("$BDRMC,1"), Err(Rejected::Unrecognized));
        assert_eq!(parse("$GN"), Err(Rejected::Unrecognized));
        assert_eq!(parse(""), Err(Rejected::Unrecognized));
        assert_eq!(Rejected::Unrecognized.kind(), None);
    }

    #[test]
    fn test_header_must_sit_on_char_boundary() {
        // Byte 6 falls inside the two-byte 'é'.
        assert_eq!(parse("$GNRM\u{e9},1,A"), Err(Rejected::Unrecognized));
    }

    #[test]
    fn test_malformed_speed_is_zero() {
        let line = "$GNRMC,123519,A,4807.038,N,01131.000,E,fast,084.4,230394";
        let fix = parse(line).unwrap();
        assert_eq!(fix.speed_knots, Some(0.0));
    }

    #[test]
    fn test_checksum_is_stripped_not_checked() {
        let line = "$GNRMC,123519,A,4807.038,N,01131.000,E,1.0,084.4,230394,003.1,W*00";
        assert!(parse(line).is_ok());
        let fields = split_fields("$GNRMC,a,b*7F");
        assert_eq!(fields.as_slice(), &["$GNRMC", "a", "b"]);
    }

    #[test]
    fn test_empty_fields_keep_their_slot() {
        let fields = split_fields("$GNRMC,,A,,N");
        assert_eq!(fields.as_slice(), &["$GNRMC", "", "A", "", "N"]);
    }

    #[test]
    fn test_field_list_is_bounded() {
        let line = ",".repeat(60);
        assert_eq!(split_fields(&line).len(), MAX_FIELDS);
    }
}
