//! Basic usage example for bitio
//!
//! Run with: cargo run --example basic_usage

use bitio::*;

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> bitio::Result<()> {
    println!("bitio Basic Usage Example");
    println!("=========================");

    // Example 1: packing small fields into one byte
    println!("\n1. Packing Fields:");
    {
        let mut output = BitOutput::new(Vec::new());
        output.write_u8(5, 19)?;
        output.write_u8(3, 5)?;
        let bytes = output.into_inner();
        println!("  19 in 5 bits + 5 in 3 bits -> {:08b}", bytes[0]);

        let mut input = BitInput::new(SliceSource::new(&bytes));
        println!("  Read back: {}, {}", input.read_u8(5)?, input.read_u8(3)?);
    }

    // Example 2: signed fields and alignment
    println!("\n2. Signed Fields and Alignment:");
    {
        let mut output = BitOutput::new(Vec::new());
        output.write_i16(10, -300)?;
        output.write_i64(1, -1)?;
        let padding = output.align(4)?;
        let bytes = output.into_inner();
        println!("  Wrote 11 bits, padded {} bits: {}", padding, hex(&bytes));

        let mut input = BitInput::new(SliceSource::new(&bytes));
        println!(
            "  Read back: {}, {}",
            input.read_i16(10)?,
            input.read_i64(1)?
        );
    }

    // Example 3: reduced float shapes
    println!("\n3. Reduced Float Shapes:");
    {
        let mut output = BitOutput::new(Vec::new());
        output.write_f64(11, 52, std::f64::consts::PI)?;
        output.write_f64(11, 20, std::f64::consts::PI)?;
        output.write_f32(8, 7, 1.5)?;
        output.align(1)?;
        let bytes = output.into_inner();
        println!("  64 + 32 + 16 bits -> {} bytes", bytes.len());

        let mut input = BitInput::new(SliceSource::new(&bytes));
        println!("  Canonical f64:     {}", input.read_f64(11, 52)?);
        println!("  f64 (11, 20):      {}", input.read_f64(11, 20)?);
        println!("  f32 (8, 7):        {}", input.read_f32(8, 7)?);
    }

    // Example 4: compact codecs for special values
    println!("\n4. Special Float Values:");
    {
        let values = [-0.0f32, f32::INFINITY, f32::NAN, f32::from_bits(0x0000_1234), 2.75];
        let mut output = BitOutput::new(Vec::new());
        for value in values {
            // 3-bit class tag, then the compact payload
            match classify(value) {
                FloatClass::Zero => {
                    output.write_u8(3, 0)?;
                    output.write_float_zero(value)?;
                }
                FloatClass::Infinity => {
                    output.write_u8(3, 1)?;
                    output.write_float_infinity(value)?;
                }
                FloatClass::NaN => {
                    output.write_u8(3, 2)?;
                    output.write_float_nan(1, value)?;
                }
                FloatClass::Subnormal => {
                    output.write_u8(3, 3)?;
                    output.write_float_subnormal(23, value)?;
                }
                FloatClass::Normal => {
                    output.write_u8(3, 4)?;
                    output.write_f32(8, 23, value)?;
                }
            }
        }
        println!("  {} values in {} bits", values.len(), output.bit_count());
        output.align(1)?;
        let bytes = output.into_inner();

        let mut input = BitInput::new(SliceSource::new(&bytes));
        for _ in 0..values.len() {
            let value: f32 = match input.read_u8(3)? {
                0 => input.read_float_zero()?,
                1 => input.read_float_infinity()?,
                2 => input.read_float_nan(1)?,
                3 => input.read_float_subnormal(23)?,
                _ => input.read_f32(8, 23)?,
            };
            println!("  Decoded: {:?}", value);
        }
    }

    // Example 5: strings, arrays and optional values
    println!("\n5. Adapters:");
    {
        let name = StringAdapter::utf8(8)?;
        let symbol = ByteArrayAdapter::new(4, ElementEncoding::AsciiPrintable)?;
        let samples = SequenceAdapter::new(6, Nullable::new(IntCodec::<i32>::new(12)?))?;

        let mut output = BitOutput::new(Vec::new());
        name.write(&mut output, "thermometer")?;
        symbol.write(&mut output, &b"TMP"[..])?;
        samples.write(&mut output, &vec![Some(215), None, Some(-40), Some(2047)])?;
        output.align(1)?;
        let bytes = output.into_inner();
        println!("  Encoded {} bytes: {}", bytes.len(), hex(&bytes));

        let mut input = BitInput::new(SliceSource::new(&bytes));
        let read_name: String = name.read(&mut input)?;
        let read_symbol: Vec<u8> = symbol.read(&mut input)?;
        let read_samples: Vec<Option<i32>> = samples.read(&mut input)?;
        println!(
            "  Decoded: name={}, symbol={}, samples={:?}",
            read_name,
            String::from_utf8_lossy(&read_symbol),
            read_samples
        );
    }

    // Example 6: shared codecs
    println!("\n6. Shared Codecs:");
    {
        let registry = CodecRegistry::global();
        let first = registry.float::<f32>(6, 9)?;
        let second = registry.float::<f32>(6, 9)?;
        println!(
            "  Same instance for equal shapes: {}",
            std::sync::Arc::ptr_eq(&first, &second)
        );
        println!("  Encoded size: {} bits", first.shape().encoded_size());
    }

    // Example 7: error handling
    println!("\n7. Error Handling:");
    {
        let mut output = BitOutput::new(Vec::new());
        match output.write_u16(17, 1) {
            Ok(()) => println!("  Unexpected success"),
            Err(e) => println!("  Width 17 for u16: {}", e),
        }
        match output.write_float_zero(1.0f64) {
            Ok(()) => println!("  Unexpected success"),
            Err(e) => println!("  Zero codec given 1.0: {}", e),
        }

        let truncated = [0xFFu8];
        let mut input = BitInput::new(SliceSource::new(&truncated));
        match input.read_u16(12) {
            Ok(v) => println!("  Unexpected value {}", v),
            Err(e) => println!("  Reading past the end: {}", e),
        }
    }

    println!("\nAll examples completed successfully!");
    Ok(())
}
