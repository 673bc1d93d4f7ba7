pub mod corpus;
pub mod logger;
pub mod row_writer;
