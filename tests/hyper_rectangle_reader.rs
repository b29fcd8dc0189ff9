use std::{error::Error, io::Write};

use ncgrid::{
    data_type::DataType,
    error::DataStoreError,
    io::{
        ChannelDataInput, ElementKind, Endianness, HyperRectangleReader, MemoryDataInput,
        PerformanceMetricsDataInput, Region,
    },
};

/// Big endian ints `0..rows*columns` of a `rows × columns` variable.
fn int_variable(rows: i32, columns: i32) -> Vec<u8> {
    (0..rows * columns).flat_map(i32::to_be_bytes).collect()
}

fn metrics_reader(
    bytes: Vec<u8>,
) -> Result<HyperRectangleReader<PerformanceMetricsDataInput<MemoryDataInput>>, DataStoreError> {
    HyperRectangleReader::new(
        DataType::Int,
        PerformanceMetricsDataInput::new(MemoryDataInput::new("T", bytes, Endianness::Big)),
        0,
    )
}

#[test]
fn hyper_rectangle_reader_full_round_trip() -> Result<(), Box<dyn Error>> {
    let values: Vec<f32> = (0..60u8).map(|i| f32::from(i) * 0.25 - 3.0).collect();
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    let mut reader =
        HyperRectangleReader::from_memory(DataType::Float, "sst", bytes, Endianness::Little)?;
    let region = Region::from_row_major(&[3, 4, 5], &[0, 0, 0], &[3, 4, 5], &[1, 1, 1])?;
    assert_eq!(region.contiguous_data_dimension(), 3);
    let array = reader.read(&region)?;
    assert_eq!(array.kind(), ElementKind::Float);
    assert_eq!(array.as_float(), Some(values.as_slice()));
    Ok(())
}

#[test]
fn hyper_rectangle_reader_minimal_seeks() -> Result<(), Box<dyn Error>> {
    let mut reader = metrics_reader(int_variable(4, 5))?;

    // Two full rows are one contiguous run.
    let region = Region::from_row_major(&[4, 5], &[1, 0], &[2, 5], &[1, 1])?;
    let values = reader.read_elements::<i32>(&region)?;
    assert_eq!(values, (5..15).collect::<Vec<_>>());
    assert_eq!(reader.input().seeks(), 1);
    assert_eq!(reader.input().bytes_read(), 40);

    // A sub-block needs one run per row.
    reader.input_mut().reset();
    let region = Region::from_row_major(&[4, 5], &[1, 1], &[3, 3], &[1, 1])?;
    let values = reader.read_elements::<i32>(&region)?;
    assert_eq!(values, vec![6, 7, 8, 11, 12, 13, 16, 17, 18]);
    assert_eq!(reader.input().seeks(), 3);

    // A column needs one run per element.
    reader.input_mut().reset();
    let region = Region::from_row_major(&[4, 5], &[0, 2], &[4, 1], &[1, 1])?;
    let values = reader.read_elements::<i32>(&region)?;
    assert_eq!(values, vec![2, 7, 12, 17]);
    assert_eq!(reader.input().seeks(), 4);
    assert_eq!(reader.input().bytes_read(), 16);
    Ok(())
}

#[test]
fn hyper_rectangle_reader_subsampling_three_dimensions() -> Result<(), Box<dyn Error>> {
    let mut reader = metrics_reader(int_variable(6, 6))?;
    // A 2 × 3 × 6 variable stored in the same 36 ints.
    let region = Region::from_row_major(&[2, 3, 6], &[0, 0, 1], &[2, 3, 5], &[1, 2, 2])?;
    assert_eq!(region.target_shape(), vec![2, 2, 3]);
    let values = reader.read_elements::<i32>(&region)?;
    assert_eq!(values, vec![1, 3, 5, 13, 15, 17, 19, 21, 23, 31, 33, 35]);
    assert_eq!(reader.input().seeks(), 12);
    Ok(())
}

#[test]
fn hyper_rectangle_reader_data_size() -> Result<(), Box<dyn Error>> {
    for (data_type, size) in [
        (DataType::Byte, 1),
        (DataType::Char, 1),
        (DataType::Short, 2),
        (DataType::UShort, 2),
        (DataType::Int, 4),
        (DataType::Int64, 8),
        (DataType::Float, 4),
        (DataType::Double, 8),
    ] {
        let reader = HyperRectangleReader::from_memory(data_type, "v", Vec::new(), Endianness::Big)?;
        assert_eq!(reader.data_size(), size, "{data_type:?}");
    }
    let reader = HyperRectangleReader::with_element_kind(
        ElementKind::Char,
        MemoryDataInput::new("v", Vec::new(), Endianness::Big),
        0,
    );
    assert_eq!(reader.data_size(), 2);
    assert!(matches!(
        HyperRectangleReader::from_memory(DataType::String, "v", Vec::new(), Endianness::Big),
        Err(DataStoreError::Content(_))
    ));
    Ok(())
}

#[test]
fn hyper_rectangle_reader_invalid_region() {
    let error: DataStoreError = Region::from_row_major(&[4, 5], &[3, 0], &[2, 5], &[1, 1])
        .unwrap_err()
        .into();
    assert!(matches!(error, DataStoreError::Content(_)));
    let error: DataStoreError = Region::new(&[u64::MAX, 4], &[0, 0], &[1, 4], &[1, 1])
        .unwrap_err()
        .into();
    assert!(matches!(error, DataStoreError::Overflow(_)));
}

#[test]
fn hyper_rectangle_reader_file() -> Result<(), Box<dyn Error>> {
    let values: Vec<f64> = (0..20).map(f64::from).collect();
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"HEADER")?;
    for value in &values {
        file.write_all(&value.to_le_bytes())?;
    }
    file.flush()?;

    let input = ChannelDataInput::open(file.path(), Endianness::Little)?;
    let mut reader = HyperRectangleReader::new(DataType::Double, input, 6)?;
    assert_eq!(reader.origin(), 6);
    let region = Region::from_row_major(&[4, 5], &[0, 1], &[4, 3], &[2, 1])?;
    let values = reader.read(&region)?;
    assert_eq!(values.as_double(), Some(&[1.0, 2.0, 3.0, 11.0, 12.0, 13.0][..]));

    // Backward seeks after a forward read.
    let region = Region::from_row_major(&[4, 5], &[0, 0], &[1, 2], &[1, 1])?;
    assert_eq!(reader.read(&region)?.as_double(), Some(&[0.0, 1.0][..]));
    Ok(())
}
