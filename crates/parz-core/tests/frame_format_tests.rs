use std::io::Cursor;

use parz_core::{FRAME_PREFIX_SIZE, ParzError, read_frame_len, write_frame};

#[test]
fn frame_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = Vec::new();
    write_frame(&mut stream, b"alpha")?;
    write_frame(&mut stream, b"bet")?;
    assert_eq!(stream.len(), 2 * FRAME_PREFIX_SIZE + 8);

    let mut source = Cursor::new(stream);
    let first = read_frame_len(&mut source)?.expect("first frame present");
    assert_eq!(first, 5);
    source.set_position(source.position() + u64::from(first));

    let second = read_frame_len(&mut source)?.expect("second frame present");
    assert_eq!(second, 3);
    source.set_position(source.position() + u64::from(second));

    assert!(read_frame_len(&mut source)?.is_none());
    Ok(())
}

#[test]
fn clean_eof_yields_no_frame() -> Result<(), Box<dyn std::error::Error>> {
    let mut source = Cursor::new(Vec::new());
    assert!(read_frame_len(&mut source)?.is_none());
    Ok(())
}

#[test]
fn partial_prefix_is_a_truncated_frame() {
    let mut source = Cursor::new(vec![0x2a, 0x00]);
    let err = read_frame_len(&mut source).expect_err("two prefix bytes cannot form a frame");
    assert!(matches!(err, ParzError::TruncatedFrame(_)), "{err}");
}

#[test]
fn zero_length_frame_is_rejected() {
    let mut source = Cursor::new(vec![0u8; FRAME_PREFIX_SIZE]);
    let err = read_frame_len(&mut source).expect_err("zero-length frames are ill-formed");
    assert!(matches!(err, ParzError::BadData(_)), "{err}");
}
