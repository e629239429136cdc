//! Parser for `iwconfig` link-state reports
//!
//! The report is read as a sequence of fields delimited by fixed marker
//! substrings in tool-defined order. A cursor walks forward through the
//! text; every field is either skipped to (leading marker) or cut off at
//! the next marker (terminating marker). Some markers have alternate
//! spellings depending on driver and wireless-tools version, these are
//! tried in the listed order.

use crate::core::{
    error::{ParseError, ParseErrorKind, ParseResult},
    types::{Field, LinkStatus},
};

const NORM: &[&str] = &["IEEE "];
const ESSID: &[&str] = &["ESSID:"];
const MODE: &[&str] = &["Mode:"];
const FREQUENCY: &[&str] = &["Frequency:", "Frequency="];
const GHZ: &[&str] = &[" GHz"];
const ACCESS_POINT: &[&str] = &["Access Point: "];
const BIT_RATE: &[&str] = &["Bit Rate=", "Bit Rate:"];
const MBPS: &[&str] = &[" Mb/s"];
const TX_POWER: &[&str] = &["Tx-Power=", "Tx-Power:"];
const DBM: &[&str] = &[" dBm"];
const RETRY_SHORT_LIMIT: &[&str] = &["Retry short limit:", "Retry short limit="];
const RTS_THRESHOLD: &[&str] = &["RTS thr:", "RTS thr="];
const FRAGMENT_THRESHOLD: &[&str] = &["Fragment thr:", "Fragment thr="];
const POWER_MANAGEMENT: &[&str] = &["Power Management:", "Power Management="];
const LINK_QUALITY: &[&str] = &["Link Quality=", "Link Quality:"];
const SIGNAL_LEVEL: &[&str] = &["Signal level=", "Signal level:"];
const RX_INVALID_NWID: &[&str] = &["Rx invalid nwid:"];
const RX_INVALID_CRYPT: &[&str] = &["Rx invalid crypt:"];
const RX_INVALID_FRAG: &[&str] = &["Rx invalid frag:"];
const TX_EXCESSIVE_RETRIES: &[&str] = &["Tx excessive retries:"];
const INVALID_MISC: &[&str] = &["Invalid misc:"];
const MISSED_BEACON: &[&str] = &["Missed beacon:"];

/// Parse the output of `iwconfig <interface>`
///
/// Returns a fully populated [`LinkStatus`] or the first field that could
/// not be extracted. Markers are matched by first occurrence after the
/// current position, there is no backtracking.
pub fn parse(raw: &str) -> ParseResult<LinkStatus> {
    let mut cursor = Cursor::new(raw);

    cursor.skip_past(Field::ProtocolNorm, NORM)?;
    let protocol_norm = cursor.take_until(Field::ProtocolNorm, ESSID)?;
    let network_name = cursor.take_line();

    cursor.skip_past(Field::Mode, MODE)?;
    let mode = cursor.take_until(Field::Mode, FREQUENCY)?;
    let frequency_ghz = decimal(Field::Frequency, cursor.take_until(Field::Frequency, GHZ)?)?;

    cursor.skip_past(Field::AccessPoint, ACCESS_POINT)?;
    let access_point = cursor.take_line();

    cursor.skip_past(Field::BitRate, BIT_RATE)?;
    let bit_rate_mbps = decimal(Field::BitRate, cursor.take_until(Field::BitRate, MBPS)?)?;

    let tx_power_dbm = if cursor.occurs(TX_POWER) {
        cursor.skip_past(Field::TxPower, TX_POWER)?;
        Some(decimal(
            Field::TxPower,
            cursor.take_until(Field::TxPower, DBM)?,
        )?)
    } else {
        None
    };

    let retry_short_limit = if cursor.occurs(RETRY_SHORT_LIMIT) {
        cursor.skip_past(Field::RetryShortLimit, RETRY_SHORT_LIMIT)?;
        Some(cursor.take_until(Field::RetryShortLimit, RTS_THRESHOLD)?)
    } else {
        cursor.skip_past(Field::RtsThreshold, RTS_THRESHOLD)?;
        None
    };
    let rts_threshold = cursor.take_until(Field::RtsThreshold, FRAGMENT_THRESHOLD)?;
    let fragment_threshold = cursor.take_line();

    cursor.skip_past(Field::PowerManagement, POWER_MANAGEMENT)?;
    let power_management = cursor.take_line();

    cursor.skip_past(Field::LinkQuality, LINK_QUALITY)?;
    let link_quality_raw = cursor.take_until(Field::LinkQuality, SIGNAL_LEVEL)?;
    let link_quality_percent = quality_percent(link_quality_raw)?;
    let signal_level_dbm = decimal(
        Field::SignalLevel,
        cursor.take_until(Field::SignalLevel, DBM)?,
    )?;

    cursor.skip_past(Field::RxInvalidNwid, RX_INVALID_NWID)?;
    let rx_invalid_nwid = counter(
        Field::RxInvalidNwid,
        cursor.take_until(Field::RxInvalidNwid, RX_INVALID_CRYPT)?,
    )?;
    let rx_invalid_crypt = counter(
        Field::RxInvalidCrypt,
        cursor.take_until(Field::RxInvalidCrypt, RX_INVALID_FRAG)?,
    )?;
    let rx_invalid_frag = counter(Field::RxInvalidFrag, cursor.take_line())?;

    cursor.skip_past(Field::TxExcessiveRetries, TX_EXCESSIVE_RETRIES)?;
    let tx_excessive_retries = counter(
        Field::TxExcessiveRetries,
        cursor.take_until(Field::TxExcessiveRetries, INVALID_MISC)?,
    )?;
    let invalid_misc = counter(
        Field::InvalidMisc,
        cursor.take_until(Field::InvalidMisc, MISSED_BEACON)?,
    )?;
    let missed_beacon = counter(Field::MissedBeacon, cursor.take_line())?;

    Ok(LinkStatus {
        protocol_norm: protocol_norm.to_string(),
        network_name: network_name.to_string(),
        mode: mode.to_string(),
        frequency_ghz,
        access_point: access_point.to_string(),
        bit_rate_mbps,
        tx_power_dbm,
        retry_short_limit: retry_short_limit.map(str::to_string),
        rts_threshold: rts_threshold.to_string(),
        fragment_threshold: fragment_threshold.to_string(),
        power_management: power_management.to_string(),
        link_quality_raw: link_quality_raw.to_string(),
        link_quality_percent,
        signal_level_dbm,
        rx_invalid_nwid,
        rx_invalid_crypt,
        rx_invalid_frag,
        tx_excessive_retries,
        invalid_misc,
        missed_beacon,
    })
}

/// Forward-only position in the report
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// First spelling found after the cursor, with its absolute offset
    fn find(&self, markers: &[&'static str]) -> Option<(usize, &'static str)> {
        markers
            .iter()
            .find_map(|marker| self.rest().find(marker).map(|i| (self.pos + i, *marker)))
    }

    /// Whether any spelling occurs after the cursor
    fn occurs(&self, markers: &[&'static str]) -> bool {
        self.find(markers).is_some()
    }

    fn locate(&self, field: Field, markers: &[&'static str]) -> ParseResult<(usize, &'static str)> {
        self.find(markers).ok_or_else(|| {
            let consumed = &self.text[..self.pos];
            let kind = match markers.iter().copied().find(|marker| consumed.contains(marker)) {
                Some(marker) => ParseErrorKind::OutOfOrder(marker),
                None => ParseErrorKind::MissingMarker(markers[0]),
            };
            ParseError::new(field, kind)
        })
    }

    /// Move the cursor just past the next marker
    fn skip_past(&mut self, field: Field, markers: &[&'static str]) -> ParseResult<()> {
        let (start, marker) = self.locate(field, markers)?;
        self.pos = start + marker.len();
        Ok(())
    }

    /// Trimmed text up to the next marker, the cursor ends past the marker
    fn take_until(&mut self, field: Field, markers: &[&'static str]) -> ParseResult<&'a str> {
        let (start, marker) = self.locate(field, markers)?;
        let value = self.text[self.pos..start].trim();
        self.pos = start + marker.len();
        Ok(value)
    }

    /// Trimmed text up to the end of the line (or of the input)
    fn take_line(&mut self) -> &'a str {
        let end = self
            .rest()
            .find('\n')
            .map_or(self.text.len(), |i| self.pos + i);
        let value = self.text[self.pos..end].trim();
        self.pos = (end + 1).min(self.text.len());
        value
    }
}

fn decimal(field: Field, token: &str) -> ParseResult<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::new(field, ParseErrorKind::InvalidNumber(token.to_string())))
}

fn counter(field: Field, token: &str) -> ParseResult<u64> {
    token
        .parse::<u64>()
        .map_err(|_| ParseError::new(field, ParseErrorKind::InvalidNumber(token.to_string())))
}

/// Convert a quality ratio such as `41/70` into a rounded percentage
fn quality_percent(raw: &str) -> ParseResult<u8> {
    let field = Field::LinkQualityPercent;
    let (numerator, denominator) = raw
        .split_once('/')
        .ok_or_else(|| ParseError::new(field, ParseErrorKind::MalformedRatio(raw.to_string())))?;

    let numerator = decimal(field, numerator.trim())?;
    let denominator = decimal(field, denominator.trim())?;
    if denominator == 0.0 {
        return Err(ParseError::new(field, ParseErrorKind::ZeroDenominator));
    }

    let percent = (numerator / denominator * 100.0).round().clamp(0.0, 100.0);
    Ok(percent as u8)
}
