/*!
MHS probe tests.

Covers the inbound health check, the outbound PDS retrieval send and its
envelope, the sequential runner, URL construction, report rendering and the
debug logger.
*/

pub mod debug_logger_tests;
