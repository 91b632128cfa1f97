//! Command implementations for bufscope
//!
//! Each command builds a report; `main` decides whether it is printed as a
//! table or as JSON.

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use tracing::debug;
use voltage_buffer::{
    BackingStore, BufferConfig, ByteOrder, DataView, ElementKind, Number, TypedView,
};

/// Elements of a typed view together with the bytes behind them
#[derive(Debug, Serialize)]
pub struct ViewReport {
    pub kind: ElementKind,
    pub order: ByteOrder,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub values: Vec<Number>,
    pub hex: String,
}

/// Single value read through the generic accessor
#[derive(Debug, Serialize)]
pub struct PeekReport {
    pub offset: usize,
    pub width: usize,
    pub order: ByteOrder,
    pub signed: bool,
    pub value: Number,
}

/// Options for `peek`
#[derive(Debug, Clone, Copy)]
pub struct PeekOptions {
    pub offset: usize,
    pub width: usize,
    pub signed: bool,
    pub float: bool,
    pub little_endian: bool,
}

/// Encode `values` as `kind` into a fresh store
pub fn encode(
    kind: ElementKind,
    order: Option<ByteOrder>,
    values: &[Number],
    config: &BufferConfig,
) -> Result<ViewReport> {
    let config = BufferConfig {
        element_order: order.unwrap_or(config.element_order),
        ..config.clone()
    };
    let view = TypedView::of_with_config(kind, values.iter().copied(), &config)
        .with_context(|| format!("Failed to encode {} values as {}", values.len(), kind))?;
    debug!(kind = %kind, bytes = view.byte_length(), "Encoded values");
    Ok(report(&view))
}

/// Decode `bytes` as elements of `kind`
pub fn decode(
    kind: ElementKind,
    order: Option<ByteOrder>,
    bytes: Vec<u8>,
    byte_offset: usize,
    length: Option<usize>,
    config: &BufferConfig,
) -> Result<ViewReport> {
    if bytes.len() > config.max_byte_length {
        anyhow::bail!(
            "Input of {} bytes exceeds max_byte_length {}",
            bytes.len(),
            config.max_byte_length
        );
    }
    let store = BackingStore::from_vec(bytes);
    let view = TypedView::with_range(store, kind, byte_offset, length)
        .with_context(|| format!("Cannot view input as {} at offset {}", kind, byte_offset))?
        .with_byte_order(order.unwrap_or(config.element_order));
    Ok(report(&view))
}

/// Read one value at an arbitrary offset
pub fn peek(bytes: Vec<u8>, options: PeekOptions) -> Result<PeekReport> {
    let order = ByteOrder::from_little_endian(options.little_endian);
    let view = DataView::new(BackingStore::from_vec(bytes));

    let value = if options.float {
        match options.width {
            4 => Number::from(view.get_float32(options.offset, options.little_endian)?),
            8 => Number::from(view.get_float64(options.offset, options.little_endian)?),
            other => anyhow::bail!("Float reads need a width of 4 or 8, got {}", other),
        }
    } else if options.signed {
        Number::from(view.get_int(options.offset, options.width, order)?)
    } else {
        Number::from(view.get_uint(options.offset, options.width, order)?)
    };

    Ok(PeekReport {
        offset: options.offset,
        width: options.width,
        order,
        signed: options.signed || options.float,
        value,
    })
}

fn report(view: &TypedView) -> ViewReport {
    let range = view.byte_offset()..view.byte_offset() + view.byte_length();
    let hex = view
        .store()
        .with_bytes(|bytes| common::hex::encode_upper(&bytes[range]));
    ViewReport {
        kind: view.kind(),
        order: view.byte_order(),
        byte_offset: view.byte_offset(),
        byte_length: view.byte_length(),
        values: view.to_vec(),
        hex,
    }
}

pub fn print_view(report: &ViewReport) {
    println!(
        "{} {} {} ({} bytes at offset {})",
        "View:".bright_cyan(),
        report.kind.to_string().bold(),
        report.order,
        report.byte_length,
        report.byte_offset
    );
    println!("{} {}", "Bytes:".bright_cyan(), report.hex);
    for (index, value) in report.values.iter().enumerate() {
        println!("  [{:>3}] {}", index, value);
    }
}

pub fn print_peek(report: &PeekReport) {
    println!(
        "{} offset {} width {} {}",
        "Peek:".bright_cyan(),
        report.offset,
        report.width,
        report.order
    );
    println!("  {}", report.value.to_string().bold());
}
