use parz_core::{
    CHUNK_SIZE, Codec, CodecKind, CompressionLevel, DeflateCodec, DeflateFraming, ParzError,
    ZstdCodec,
};

const SAMPLE: &[u8] = b"The quick brown fox jumps over the lazy dog. \
    Pack my box with five dozen liquor jugs. ";

fn sample_bytes(len: usize) -> Vec<u8> {
    SAMPLE.iter().copied().cycle().take(len).collect()
}

/// Deterministic noise that deflate and zstd cannot meaningfully shrink.
fn noise_bytes(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 32) as u8
        })
        .collect()
}

fn one_shot<C: Codec>(codec: &C, input: &[u8]) -> Result<Vec<u8>, ParzError> {
    let mut ctx = codec.new_compressor()?;
    let mut output = vec![0u8; codec.compress_bound(input.len())];
    let written = codec.compress(&mut ctx, input, &mut output)?;
    output.truncate(written);
    Ok(output)
}

fn one_shot_reverse<C: Codec>(
    codec: &C,
    payload: &[u8],
    capacity: usize,
) -> Result<Vec<u8>, ParzError> {
    let mut ctx = codec.new_decompressor()?;
    let mut output = vec![0u8; capacity];
    let written = codec.decompress(&mut ctx, payload, &mut output)?;
    output.truncate(written);
    Ok(output)
}

#[test]
fn every_deflate_framing_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let input = sample_bytes(40_000);
    for framing in [
        DeflateFraming::Raw,
        DeflateFraming::Gzip,
        DeflateFraming::Zlib,
    ] {
        let codec = DeflateCodec::new(framing, CompressionLevel::Default);
        let payload = one_shot(&codec, &input)?;
        assert!(payload.len() < input.len(), "{framing:?} did not compress");
        let restored = one_shot_reverse(&codec, &payload, CHUNK_SIZE)?;
        assert_eq!(restored, input, "{framing:?} round trip mismatch");
    }
    Ok(())
}

#[test]
fn zstd_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let input = sample_bytes(40_000);
    let codec = ZstdCodec::new(CompressionLevel::Fast);
    let payload = one_shot(&codec, &input)?;
    assert!(payload.len() < input.len());
    assert_eq!(one_shot_reverse(&codec, &payload, CHUNK_SIZE)?, input);
    Ok(())
}

#[test]
fn contexts_reset_between_chunks() -> Result<(), Box<dyn std::error::Error>> {
    let codec = DeflateCodec::new(DeflateFraming::Gzip, CompressionLevel::Fast);
    let mut comp = codec.new_compressor()?;
    let mut decomp = codec.new_decompressor()?;

    for round in 0..3u8 {
        let input: Vec<u8> = sample_bytes(10_000 + round as usize * 777)
            .iter()
            .map(|byte| byte.wrapping_add(round))
            .collect();
        let mut payload = vec![0u8; codec.compress_bound(input.len())];
        let written = codec.compress(&mut comp, &input, &mut payload)?;

        let mut restored = vec![0u8; CHUNK_SIZE];
        let restored_len = codec.decompress(&mut decomp, &payload[..written], &mut restored)?;
        assert_eq!(&restored[..restored_len], &input[..]);
    }
    Ok(())
}

#[test]
fn bound_covers_incompressible_chunks() -> Result<(), Box<dyn std::error::Error>> {
    let input = noise_bytes(CHUNK_SIZE);
    for framing in [
        DeflateFraming::Raw,
        DeflateFraming::Gzip,
        DeflateFraming::Zlib,
    ] {
        let codec = DeflateCodec::new(framing, CompressionLevel::Best);
        let payload = one_shot(&codec, &input)?;
        assert_eq!(one_shot_reverse(&codec, &payload, CHUNK_SIZE)?, input);
    }

    let codec = ZstdCodec::new(CompressionLevel::Best);
    let payload = one_shot(&codec, &input)?;
    assert_eq!(one_shot_reverse(&codec, &payload, CHUNK_SIZE)?, input);
    Ok(())
}

#[test]
fn levels_map_into_native_ranges() {
    assert_eq!(DeflateCodec::new(DeflateFraming::Raw, CompressionLevel::Fastest).level(), 1);
    assert_eq!(DeflateCodec::new(DeflateFraming::Raw, CompressionLevel::Best).level(), 9);
    assert_eq!(
        DeflateCodec::new(DeflateFraming::Raw, CompressionLevel::Explicit(42)).level(),
        9
    );
    assert_eq!(
        DeflateCodec::new(DeflateFraming::Raw, CompressionLevel::Explicit(-3)).level(),
        1
    );

    assert_eq!(ZstdCodec::new(CompressionLevel::Fastest).level(), 1);
    assert_eq!(ZstdCodec::new(CompressionLevel::Best).level(), 22);
    assert_eq!(ZstdCodec::new(CompressionLevel::Explicit(100)).level(), 22);
    assert_eq!(ZstdCodec::new(CompressionLevel::Explicit(0)).level(), 1);
}

#[test]
fn for_kind_covers_the_deflate_family_only() {
    for kind in [CodecKind::Deflate, CodecKind::Gzip, CodecKind::Zlib] {
        let codec = DeflateCodec::for_kind(kind, CompressionLevel::Default)
            .expect("deflate-family kind must map to a codec");
        assert_eq!(codec.kind(), kind);
    }
    assert!(DeflateCodec::for_kind(CodecKind::Zstd, CompressionLevel::Default).is_none());
}

#[test]
fn corrupt_payload_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let input = sample_bytes(20_000);
    for framing in [DeflateFraming::Gzip, DeflateFraming::Zlib] {
        let codec = DeflateCodec::new(framing, CompressionLevel::Default);
        let mut payload = one_shot(&codec, &input)?;
        let middle = payload.len() / 2;
        payload[middle] ^= 0x10;

        let err = one_shot_reverse(&codec, &payload, CHUNK_SIZE)
            .expect_err("framed checksums must catch a bit flip");
        assert!(matches!(err, ParzError::BadData(_)), "{framing:?}: {err}");
    }
    Ok(())
}

#[test]
fn undersized_output_buffer_is_bad_data() -> Result<(), Box<dyn std::error::Error>> {
    let input = sample_bytes(20_000);

    let deflate = DeflateCodec::new(DeflateFraming::Zlib, CompressionLevel::Default);
    let payload = one_shot(&deflate, &input)?;
    let err = one_shot_reverse(&deflate, &payload, 64)
        .expect_err("payload cannot fit in a 64-byte buffer");
    assert!(matches!(err, ParzError::BadData(_)), "{err}");

    let zstd = ZstdCodec::new(CompressionLevel::Default);
    let payload = one_shot(&zstd, &input)?;
    let err = one_shot_reverse(&zstd, &payload, 64)
        .expect_err("payload cannot fit in a 64-byte buffer");
    assert!(matches!(err, ParzError::BadData(_)), "{err}");
    Ok(())
}
