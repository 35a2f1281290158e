//! Generated-style stubs for the built-in testbench procedures.
//!
//! Each procedure is a thin binding over [`Channel::call`]: it names
//! its request and reply identifiers and provides the encode/decode
//! closures. All synchronization lives in the channel; a stub body is
//! what a code generator would emit from the procedure's signature.
//!
//! Identifier assignment follows the generator convention: requests
//! get even identifiers, each reply the following odd one.

use wirecall_channel::{Channel, Service, Transport};
use wirecall_codec::{WireCursor, WireWriter};
use wirecall_frame::CommandCatalog;

pub const SQUARE_REQUEST: u8 = 2;
pub const SQUARE_REPLY: u8 = 3;
pub const TEST_REQUEST: u8 = 4;
pub const TEST_REPLY: u8 = 5;

/// Elements in the `test` procedure's in/out array.
pub const TEST_ARRAY_LEN: usize = 42;

/// Every request the testbench service accepts, with total wire
/// lengths (identifier byte included).
pub static REQUESTS: CommandCatalog = CommandCatalog::new(&[
    (SQUARE_REQUEST, 5),
    (TEST_REQUEST, 85),
]);

/// Every reply a testbench client can receive.
pub static REPLIES: CommandCatalog = CommandCatalog::new(&[
    (SQUARE_REPLY, 5),
    (TEST_REPLY, 89),
]);

/// `square(i: i32) -> i32`
pub fn square(channel: &Channel<impl Transport>, i: i32) -> wirecall_channel::Result<i32> {
    channel.call(
        SQUARE_REQUEST,
        SQUARE_REPLY,
        |w| w.put(&i),
        |r| r.take::<i32>(),
    )
}

/// `test(data_inout: [u16; 42]) -> i32`
///
/// The array is sent as an argument and overwritten with the peer's
/// updated values; the return value comes first in the reply payload.
pub fn test(
    channel: &Channel<impl Transport>,
    data_inout: &mut [u16; TEST_ARRAY_LEN],
) -> wirecall_channel::Result<i32> {
    let sent = *data_inout;
    channel.call(
        TEST_REQUEST,
        TEST_REPLY,
        |w| w.put(&sent),
        |r| {
            let returned: i32 = r.take()?;
            *data_inout = r.take()?;
            Ok(returned)
        },
    )
}

/// The responder side of the testbench: squares integers, and for the
/// array procedure returns the element sum while incrementing every
/// element in place.
pub struct TestbenchService;

impl Service for TestbenchService {
    fn requests(&self) -> &'static CommandCatalog {
        &REQUESTS
    }

    fn dispatch(
        &mut self,
        request: u8,
        args: &mut WireCursor<'_>,
        reply: &mut WireWriter<'_>,
    ) -> wirecall_codec::Result<()> {
        match request {
            SQUARE_REQUEST => {
                let i: i32 = args.take()?;
                reply.put(&SQUARE_REPLY);
                reply.put(&i.wrapping_mul(i));
            }
            TEST_REQUEST => {
                let mut data: [u16; TEST_ARRAY_LEN] = args.take()?;
                let sum: i32 = data.iter().map(|&v| i32::from(v)).sum();
                for v in &mut data {
                    *v = v.wrapping_add(1);
                }
                reply.put(&TEST_REPLY);
                reply.put(&sum);
                reply.put(&data);
            }
            other => {
                tracing::warn!(id = other, "request identifier not in dispatch table");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use wirecall_codec::Wire;

    use super::*;

    #[test]
    fn catalog_lengths_match_the_declared_signatures() {
        // request = id + args, reply = id + return value + out args.
        assert_eq!(REQUESTS.wire_len(SQUARE_REQUEST), Some(1 + i32::WIDTH));
        assert_eq!(REPLIES.wire_len(SQUARE_REPLY), Some(1 + i32::WIDTH));
        assert_eq!(
            REQUESTS.wire_len(TEST_REQUEST),
            Some(1 + <[u16; TEST_ARRAY_LEN]>::WIDTH)
        );
        assert_eq!(
            REPLIES.wire_len(TEST_REPLY),
            Some(1 + i32::WIDTH + <[u16; TEST_ARRAY_LEN]>::WIDTH)
        );
    }

    #[test]
    fn service_squares() {
        let mut service = TestbenchService;
        let args = [6i32.to_le_bytes()].concat();
        let mut cursor = WireCursor::new(&args);
        let mut out = BytesMut::new();
        let mut reply = WireWriter::new(&mut out);

        service
            .dispatch(SQUARE_REQUEST, &mut cursor, &mut reply)
            .expect("dispatch should succeed");

        assert_eq!(out.as_ref(), [SQUARE_REPLY, 36, 0, 0, 0]);
    }

    #[test]
    fn service_sums_and_increments_the_array() {
        let mut service = TestbenchService;
        let mut args = Vec::new();
        for i in 0..TEST_ARRAY_LEN as u16 {
            args.extend_from_slice(&i.to_le_bytes());
        }
        let mut cursor = WireCursor::new(&args);
        let mut out = BytesMut::new();
        let mut reply = WireWriter::new(&mut out);

        service
            .dispatch(TEST_REQUEST, &mut cursor, &mut reply)
            .expect("dispatch should succeed");

        let mut read = WireCursor::new(&out);
        assert_eq!(read.take::<u8>().unwrap(), TEST_REPLY);
        let expected_sum: i32 = (0..TEST_ARRAY_LEN as i32).sum();
        assert_eq!(read.take::<i32>().unwrap(), expected_sum);
        let data: [u16; TEST_ARRAY_LEN] = read.take().unwrap();
        for (i, v) in data.iter().enumerate() {
            assert_eq!(*v, i as u16 + 1);
        }
        assert_eq!(read.remaining(), 0);
    }
}
