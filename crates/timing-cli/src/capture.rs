//! Raw capture files.
//!
//! A capture is a plain sequence of datagrams, each prefixed by its length as
//! a little-endian u32. `listen --record` writes them; `decode` and
//! `standings` read them back.

use crate::error::CliError;
use racing_timing_wire::ByteReader;
use std::io::{self, Write};

const LENGTH_PREFIX: usize = 4;

/// Append one datagram to `out`.
pub fn write_datagram(out: &mut impl Write, datagram: &[u8]) -> io::Result<()> {
    let len = u32::try_from(datagram.len())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    out.write_all(&len.to_le_bytes())?;
    out.write_all(datagram)
}

/// Iterate the datagrams of a capture held in memory.
pub fn datagrams(data: &[u8]) -> Datagrams<'_> {
    Datagrams {
        data,
        offset: 0,
        failed: false,
    }
}

/// Yields each datagram in order. A record that runs past the end of the
/// data yields one [`CliError::TruncatedCapture`] and ends the iteration.
pub struct Datagrams<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Iterator for Datagrams<'a> {
    type Item = Result<&'a [u8], CliError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }
        let start = self.offset;
        let record = ByteReader::at(self.data, start)
            .u32_le()
            .ok()
            .and_then(|len| usize::try_from(len).ok())
            .and_then(|len| {
                let body = start.checked_add(LENGTH_PREFIX)?;
                let end = body.checked_add(len)?;
                Some((self.data.get(body..end)?, end))
            });
        match record {
            Some((datagram, end)) => {
                self.offset = end;
                Some(Ok(datagram))
            }
            None => {
                self.failed = true;
                Some(Err(CliError::TruncatedCapture { offset: start }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn written_datagrams_read_back_in_order() -> TestResult {
        let mut buf = Vec::new();
        write_datagram(&mut buf, b"first")?;
        write_datagram(&mut buf, b"")?;
        write_datagram(&mut buf, b"third one")?;

        let read: Vec<&[u8]> = datagrams(&buf).collect::<Result<_, _>>()?;
        assert_eq!(read, vec![&b"first"[..], &b""[..], &b"third one"[..]]);
        Ok(())
    }

    #[test]
    fn empty_capture_has_no_datagrams() {
        assert_eq!(datagrams(&[]).count(), 0);
    }

    #[test]
    fn truncated_record_stops_iteration() -> TestResult {
        let mut buf = Vec::new();
        write_datagram(&mut buf, b"ok")?;
        buf.extend_from_slice(&10u32.to_le_bytes());
        buf.extend_from_slice(b"short");

        let mut iter = datagrams(&buf);
        assert!(matches!(iter.next(), Some(Ok(b"ok"))));
        assert!(matches!(
            iter.next(),
            Some(Err(CliError::TruncatedCapture { offset: 6 }))
        ));
        assert!(iter.next().is_none());
        Ok(())
    }

    #[test]
    fn dangling_length_prefix_is_truncation() {
        let buf = [1u8, 0];
        assert!(matches!(
            datagrams(&buf).next(),
            Some(Err(CliError::TruncatedCapture { offset: 0 }))
        ));
    }
}
