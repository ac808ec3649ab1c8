//! Streaming character shingling.
//!
//! A [`Shingler`] turns a byte stream into a lazy sequence of
//! overlapping `N`-character windows. The sequence is finite and
//! non-restartable; documents shorter than `N` characters yield nothing.
//!
//! Read errors and invalid UTF-8 terminate the sequence silently: a
//! truncated stream simply produces fewer shingles, which degrades
//! signature precision rather than failing the operation.

use std::collections::VecDeque;
use std::io::{self, Read};

const READ_CHUNK: usize = 4096;

/// Lazy iterator of overlapping `N`-character shingles over a reader.
pub struct Shingler<R: Read> {
    reader: R,
    size: usize,
    window: VecDeque<char>,
    decoded: VecDeque<char>,
    pending: Vec<u8>,
    done: bool,
}

impl<R: Read> Shingler<R> {
    /// Create a shingler producing `size`-character windows over `reader`.
    pub fn new(reader: R, size: usize) -> Self {
        Self {
            reader,
            size,
            window: VecDeque::with_capacity(size),
            decoded: VecDeque::new(),
            pending: Vec::new(),
            done: false,
        }
    }

    /// Pull the next decoded character, reading more bytes as needed.
    fn next_char(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.decoded.pop_front() {
                return Some(c);
            }
            if self.done {
                return None;
            }

            let mut chunk = [0u8; READ_CHUNK];
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    // EOF; an incomplete trailing sequence is dropped
                    self.done = true;
                }
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    self.decode_pending();
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(_) => {
                    // truncation: emit what was read so far, then stop
                    self.done = true;
                }
            }
        }
    }

    /// Decode as much of the pending byte buffer as is valid UTF-8.
    fn decode_pending(&mut self) {
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                self.decoded.extend(text.chars());
                self.pending.clear();
            }
            Err(err) => {
                let valid = err.valid_up_to();
                if let Ok(text) = std::str::from_utf8(&self.pending[..valid]) {
                    self.decoded.extend(text.chars());
                }
                match err.error_len() {
                    // incomplete multi-byte sequence: keep the tail for the next read
                    None => {
                        self.pending.drain(..valid);
                    }
                    // invalid sequence: treated like a read error
                    Some(_) => {
                        self.pending.clear();
                        self.done = true;
                    }
                }
            }
        }
    }
}

impl<R: Read> Iterator for Shingler<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.size == 0 {
            return None;
        }

        if self.window.len() < self.size {
            while self.window.len() < self.size {
                let c = self.next_char()?;
                self.window.push_back(c);
            }
        } else {
            self.window.pop_front();
            let c = self.next_char()?;
            self.window.push_back(c);
        }

        Some(self.window.iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shingles(text: &str, size: usize) -> Vec<String> {
        Shingler::new(text.as_bytes(), size).collect()
    }

    #[test]
    fn test_bigrams_overlap() {
        assert_eq!(shingles("hello", 2), vec!["he", "el", "ll", "lo"]);
    }

    #[test]
    fn test_window_equal_to_input() {
        assert_eq!(shingles("abc", 3), vec!["abc"]);
    }

    #[test]
    fn test_short_document_yields_nothing() {
        assert!(shingles("a", 2).is_empty());
        assert!(shingles("", 2).is_empty());
    }

    #[test]
    fn test_multibyte_characters_count_as_one() {
        assert_eq!(shingles("héllo", 2), vec!["hé", "él", "ll", "lo"]);
    }

    #[test]
    fn test_read_error_truncates_silently() {
        struct FailAfter {
            data: Vec<u8>,
            pos: usize,
        }

        impl Read for FailAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.pos >= self.data.len() {
                    return Err(io::Error::other("stream broke"));
                }
                buf[0] = self.data[self.pos];
                self.pos += 1;
                Ok(1)
            }
        }

        let reader = FailAfter {
            data: b"abcd".to_vec(),
            pos: 0,
        };
        assert_eq!(
            Shingler::new(reader, 2).collect::<Vec<_>>(),
            vec!["ab", "bc", "cd"]
        );
    }

    #[test]
    fn test_invalid_utf8_truncates_silently() {
        let bytes: &[u8] = &[b'a', b'b', b'c', 0xff, b'd', b'e'];
        assert_eq!(
            Shingler::new(bytes, 2).collect::<Vec<_>>(),
            vec!["ab", "bc"]
        );
    }
}
