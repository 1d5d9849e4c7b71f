pub mod failure_writer;
pub mod payment_reader;
