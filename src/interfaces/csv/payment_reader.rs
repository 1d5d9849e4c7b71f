use crate::domain::payment::{PaymentRequest, PaymentRow};
use crate::error::{PayoutError, Result};
use std::io::Read;

/// Reads payment requests from a headerless `handle,amount` CSV source.
///
/// Fields are trimmed and empty lines are skipped. Rows that fail to parse or
/// validate are yielded as errors so the caller can log and skip them.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads, deserializes and validates each row.
    pub fn payments(self) -> impl Iterator<Item = Result<PaymentRequest>> {
        self.reader.into_deserialize().map(|result| {
            result
                .map_err(PayoutError::from)
                .and_then(|row: PaymentRow| PaymentRequest::try_from(row))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "alice.algo,1000000\n\n  bob.algo , 25 \n";
        let reader = PaymentReader::new(data.as_bytes());
        let results: Vec<Result<PaymentRequest>> = reader.payments().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.handle, "alice.algo");
        assert_eq!(first.amount.value(), 1_000_000);
        let second = results[1].as_ref().unwrap();
        assert_eq!(second.handle, "bob.algo");
        assert_eq!(second.amount.value(), 25);
    }

    #[test]
    fn test_reader_bad_rows_do_not_stop_the_stream() {
        let data = "alice.algo,abc\nbob.algo,0\n,5\ncarol.algo\ndave.algo,7";
        let reader = PaymentReader::new(data.as_bytes());
        let results: Vec<Result<PaymentRequest>> = reader.payments().collect();

        assert_eq!(results.len(), 5);
        assert!(matches!(results[0], Err(PayoutError::CsvError(_))));
        assert!(matches!(results[1], Err(PayoutError::ValidationError(_))));
        assert!(matches!(results[2], Err(PayoutError::ValidationError(_))));
        assert!(results[3].is_err());
        assert_eq!(results[4].as_ref().unwrap().handle, "dave.algo");
    }
}
