//! Wi-Fi scanning and BSS dump parsing.
//!
//! SCAN only starts a scan. Results are fetched once the daemon announces
//! `CTRL-EVENT-SCAN-RESULTS`, by dumping every BSS and folding each record
//! into the scan cache.

use log::{debug, warn};

use crate::api::models::{Fault, NetworkDescriptor, Notification, ScanRecord, WpaError};
use crate::core::session::Session;
use crate::types::constants::{command, field, reply};
use crate::util::utils::field_value;
use crate::Result;

/// Requests a scan. A non-OK reply is reported as busy and not retried.
pub(crate) async fn scan(session: &Session) -> Result<()> {
    let reply = session.write(command::SCAN).await?;

    if !reply.is_ok() {
        warn!("SCAN rejected: {reply}");
        session.notify(Notification::Error(Fault::ScanBusy));
        return Err(WpaError::ScanBusy);
    }

    Ok(())
}

/// Splits a BSS dump into records.
///
/// Each record ends with a `====` line. Blank and `####` lines are skipped.
/// Fields are reset between records, and a trailing record without a
/// terminator is dropped.
pub(crate) fn parse_bss_dump(payload: &str) -> Vec<ScanRecord> {
    let mut records = Vec::new();
    let mut current = ScanRecord::default();

    for line in payload.lines() {
        if line.is_empty() || line == reply::BSS_FILLER {
            continue;
        }

        if let Some(v) = field_value(line, field::BSSID) {
            current.bssid = v.to_string();
        } else if let Some(v) = field_value(line, field::FREQ) {
            current.freq = v.to_string();
        } else if let Some(v) = field_value(line, field::LEVEL) {
            current.level = v.to_string();
        } else if let Some(v) = field_value(line, field::TSF) {
            current.tsf = v.to_string();
        } else if let Some(v) = field_value(line, field::FLAGS) {
            current.flags = v.to_string();
        } else if let Some(v) = field_value(line, field::SSID) {
            current.ssid = v.to_string();
        } else if line.starts_with(reply::BSS_SEPARATOR) {
            records.push(std::mem::take(&mut current));
        }
    }

    records
}

/// Dumps all BSS entries into the scan cache and announces a discovery.
///
/// A failed dump raises [`Fault::ScanResultsUnavailable`] and leaves the
/// cache untouched.
pub(crate) async fn refresh_scan_results(session: &Session) -> Result<()> {
    let reply = match session.write(command::BSS_DUMP).await {
        Ok(reply) if !reply.is_fail() => reply,
        Ok(reply) => {
            warn!("BSS dump rejected: {reply}");
            session.notify(Notification::Error(Fault::ScanResultsUnavailable));
            return Err(WpaError::CommandRejected {
                command: command::BSS_DUMP.into(),
                reply: reply.trimmed().into(),
            });
        }
        Err(e) => {
            warn!("BSS dump failed: {e}");
            session.notify(Notification::Error(Fault::ScanResultsUnavailable));
            return Err(e);
        }
    };

    let records = parse_bss_dump(reply.as_str());
    debug!("BSS dump returned {} records", records.len());

    {
        let mut state = session.state().await;
        for record in records {
            state.cache.upsert(NetworkDescriptor::from_record(record));
        }
        debug!("Scan cache holds {} access points", state.cache.len());
    }

    session.notify(Notification::Discovery);
    Ok(())
}

/// Returns the cached access points, or `None` if nothing was seen yet.
pub(crate) async fn scan_results(session: &Session) -> Option<Vec<NetworkDescriptor>> {
    session.state().await.cache.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "id=0\n\
bssid=00:11:22:33:44:55\n\
freq=2437\n\
level=-45\n\
tsf=0000012345678\n\
flags=[WPA2-PSK-CCMP][ESS]\n\
ssid=home\n\
====\n\
id=1\n\
bssid=66:77:88:99:aa:bb\n\
freq=5180\n\
level=-70\n\
tsf=0000098765432\n\
flags=[ESS]\n\
ssid=\n\
====\n";

    #[test]
    fn parses_records() {
        let records = parse_bss_dump(DUMP);
        assert_eq!(records.len(), 2);

        assert_eq!(
            records[0],
            ScanRecord {
                bssid: "00:11:22:33:44:55".into(),
                freq: "2437".into(),
                level: "-45".into(),
                tsf: "0000012345678".into(),
                flags: "[WPA2-PSK-CCMP][ESS]".into(),
                ssid: "home".into(),
            }
        );
        assert_eq!(records[1].ssid, "");
        assert_eq!(records[1].flags, "[ESS]");
    }

    #[test]
    fn skips_blank_and_filler_lines() {
        let records = parse_bss_dump("####\n\nbssid=aa\nssid=x\n####\n====\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bssid, "aa");
        assert_eq!(records[0].ssid, "x");
    }

    #[test]
    fn fields_do_not_leak_between_records() {
        let records = parse_bss_dump("bssid=aa\nlevel=-1\nssid=x\n====\nbssid=bb\nssid=y\n====\n");
        assert_eq!(records[1].level, "");
    }

    #[test]
    fn unterminated_record_is_dropped() {
        let records = parse_bss_dump("bssid=aa\nssid=x\n====\nbssid=bb\nssid=y\n");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn empty_dump() {
        assert!(parse_bss_dump("").is_empty());
    }
}
