//! Integration tests for bitio
//!
//! These tests verify end-to-end functionality across endpoints and codecs.

use bitio::*;
use std::io::Cursor;

#[test]
fn test_packs_19_and_5_into_one_byte() {
    let mut output = BitOutput::new(Vec::new());
    output.write_u8(5, 19).unwrap();
    output.write_u8(3, 5).unwrap();
    assert_eq!(output.count(), 1);
    assert_eq!(output.align(1).unwrap(), 0);
    let bytes = output.into_inner();
    assert_eq!(bytes, [0b1001_1101]);

    let mut input = BitInput::new(SliceSource::new(&bytes));
    assert_eq!(input.read_u8(5).unwrap(), 19);
    assert_eq!(input.read_u8(3).unwrap(), 5);
    assert_eq!(input.count(), 1);
    assert_eq!(input.align(1).unwrap(), 0);
}

#[test]
fn test_every_container_width_roundtrip() {
    let mut output = BitOutput::new(Vec::new());
    for width in 1..=8 {
        output.write_u8(width, 0xA5).unwrap();
        output.write_i8(width, -(1 << (width - 1)) as i8).unwrap();
    }
    for width in 1..=16 {
        output.write_u16(width, 0xBEEF).unwrap();
        output.write_i16(width, (1i32 << (width - 1)).wrapping_sub(1) as i16).unwrap();
    }
    for width in 1..=32 {
        output.write_u32(width, 0xDEAD_BEEF).unwrap();
        output.write_i32(width, -1).unwrap();
    }
    for width in 1..=64 {
        output.write_u64(width, 0x0123_4567_89AB_CDEF).unwrap();
        output.write_i64(width, i64::MIN >> (64 - width)).unwrap();
    }
    output.align(1).unwrap();
    let bytes = output.into_inner();

    let mut input = BitInput::new(SliceSource::new(&bytes));
    for width in 1..=8u32 {
        assert_eq!(input.read_u8(width).unwrap(), 0xA5 & mask(width) as u8);
        assert_eq!(input.read_i8(width).unwrap(), -(1 << (width - 1)) as i8);
    }
    for width in 1..=16u32 {
        assert_eq!(input.read_u16(width).unwrap(), 0xBEEF & mask(width) as u16);
        assert_eq!(
            input.read_i16(width).unwrap(),
            (1i32 << (width - 1)).wrapping_sub(1) as i16
        );
    }
    for width in 1..=32u32 {
        assert_eq!(input.read_u32(width).unwrap(), 0xDEAD_BEEF & mask(width) as u32);
        assert_eq!(input.read_i32(width).unwrap(), -1);
    }
    for width in 1..=64u32 {
        assert_eq!(
            input.read_u64(width).unwrap(),
            0x0123_4567_89AB_CDEF & mask(width)
        );
        assert_eq!(input.read_i64(width).unwrap(), i64::MIN >> (64 - width));
    }
}

fn mask(width: u32) -> u64 {
    if width == 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[test]
fn test_width_boundaries_rejected() {
    let mut output = BitOutput::new(Vec::new());
    for (container, max) in [
        (Container::Bits8, 8),
        (Container::Bits16, 16),
        (Container::Bits32, 32),
        (Container::Bits64, 64),
    ] {
        for unsigned in [true, false] {
            for width in [0, max + 1] {
                let err = Width::new(container, unsigned, width).unwrap_err();
                assert_eq!(
                    err,
                    Error::InvalidWidth {
                        container,
                        unsigned,
                        width
                    }
                );
                assert!(err.is_argument_error());
            }
        }
    }

    assert!(output.write_u8(9, 0).is_err());
    assert!(output.write_i32(33, 0).is_err());
    assert!(output.write_i64(0, 0).is_err());
    assert_eq!(output.bit_count(), 0);
}

#[test]
fn test_align_reaches_multiple() {
    for bits_before in 0..40u32 {
        for multiple in [1u32, 2, 3, 4, 8] {
            let mut output = BitOutput::new(Vec::new());
            for _ in 0..bits_before {
                output.write_bool(true).unwrap();
            }
            let padding = output.align(multiple).unwrap();
            let total = bits_before as u64 + padding;
            assert_eq!(total % (multiple as u64 * 8), 0);
            assert!(padding < multiple as u64 * 8 + 8);
            assert_eq!(output.count() % multiple as u64, 0);

            let bytes = output.into_inner();
            let mut input = BitInput::new(SliceSource::new(&bytes));
            for _ in 0..bits_before {
                assert!(input.read_bool().unwrap());
            }
            assert_eq!(input.align(multiple).unwrap(), padding);
            assert_eq!(input.count(), bytes.len() as u64);
        }
    }
}

#[test]
fn test_align_when_already_aligned_is_noop() {
    let mut output = BitOutput::new(Vec::new());
    output.write_u32(32, 7).unwrap();
    assert_eq!(output.align(4).unwrap(), 0);
    assert_eq!(output.align(2).unwrap(), 0);
    assert_eq!(output.into_inner().len(), 4);
}

#[test]
fn test_io_stream_endpoints() {
    let mut output = BitOutput::new(WriteSink::new(Vec::new()));
    output.write_u16(11, 1234).unwrap();
    output.write_i8(3, -4).unwrap();
    output.write_f32(8, 23, -2.5).unwrap();
    output.align(1).unwrap();
    let bytes = output.into_inner().into_inner();
    assert_eq!(bytes.len(), 6);

    let mut input = BitInput::new(ReadSource::new(Cursor::new(bytes)));
    assert_eq!(input.read_u16(11).unwrap(), 1234);
    assert_eq!(input.read_i8(3).unwrap(), -4);
    assert_eq!(input.read_f32(8, 23).unwrap(), -2.5);
    input.align(1).unwrap();
    assert_eq!(input.read_u8(1), Err(Error::UnexpectedEof));
}

#[test]
fn test_slice_sink_reports_short_buffer() {
    let mut buf = [0u8; 1];
    let mut output = BitOutput::new(SliceSink::new(&mut buf));
    output.write_u16(12, 0xFFF).unwrap();
    assert_eq!(output.write_u8(5, 0), Err(Error::ShortBuffer));
    assert_eq!(output.get_ref().position(), 1);
}

#[test]
fn test_mixed_record_with_adapters() {
    let name = StringAdapter::utf8(8).unwrap();
    let tags = ByteArrayAdapter::new(4, ElementEncoding::AsciiPrintable).unwrap();
    let reading = Nullable::new(IntCodec::<i16>::new(9).unwrap());
    let readings = SequenceAdapter::new(5, reading).unwrap();

    let mut output = BitOutput::new(Vec::new());
    name.write(&mut output, "sensor-7").unwrap();
    tags.write(&mut output, &b"OK"[..]).unwrap();
    readings
        .write(&mut output, &vec![Some(-256i16), None, Some(255)])
        .unwrap();
    output.write_value(&Some(0.75f64)).unwrap();
    let padding = output.align(1).unwrap();
    let bytes = output.into_inner();

    let mut input = BitInput::new(SliceSource::new(&bytes));
    let read_name: String = name.read(&mut input).unwrap();
    let read_tags: Vec<u8> = tags.read(&mut input).unwrap();
    let read_readings: Vec<Option<i16>> = readings.read(&mut input).unwrap();
    let read_value: Option<f64> = input.read_value().unwrap();

    assert_eq!(read_name, "sensor-7");
    assert_eq!(read_tags, b"OK");
    assert_eq!(read_readings, [Some(-256), None, Some(255)]);
    assert_eq!(read_value, Some(0.75));
    assert_eq!(input.align(1).unwrap(), padding);
    assert!(input.get_ref().is_at_end());
}

#[test]
fn test_error_display() {
    let err = BitOutput::new(Vec::new()).write_i16(17, 1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "bit width out of range for integer container: signed 16-bit field of width 17"
    );
    assert_eq!(
        Error::InvalidAlignment.to_string(),
        "alignment byte multiple is not positive"
    );
}
