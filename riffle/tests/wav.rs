#![allow(missing_docs)]

use riffle::chunk::ChunkId;
use riffle::error::ErrorKind;
use riffle::riff::Endianness;
use riffle::wav::{BextMetadata, FmtMetadata, WavEncoding, WavFile};

use std::io::{Cursor, Write};

use tempfile::NamedTempFile;

fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
	let mut bytes = Vec::new();
	bytes.extend_from_slice(id);
	bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
	bytes.extend_from_slice(payload);
	if payload.len() % 2 != 0 {
		bytes.push(0);
	}
	bytes
}

fn fmt_payload(encoding: u16, channels: u16, sample_rate: u32, bit_depth: u16) -> Vec<u8> {
	let block_align = ((u32::from(bit_depth) * u32::from(channels)) / 8) as u16;
	let bytes_per_sec =
		((u64::from(sample_rate) * u64::from(bit_depth) * u64::from(channels)) / 8) as u32;
	let mut bytes = Vec::new();
	bytes.extend_from_slice(&encoding.to_le_bytes());
	bytes.extend_from_slice(&channels.to_le_bytes());
	bytes.extend_from_slice(&sample_rate.to_le_bytes());
	bytes.extend_from_slice(&bytes_per_sec.to_le_bytes());
	bytes.extend_from_slice(&block_align.to_le_bytes());
	bytes.extend_from_slice(&bit_depth.to_le_bytes());
	bytes
}

fn bext_payload() -> Vec<u8> {
	let mut bytes = vec![0u8; 602];
	bytes[..9].copy_from_slice(b"a session");
	// Space padding instead of NULs, to catch lossy re-padding
	bytes[9..256].fill(b' ');
	bytes[256..263].copy_from_slice(b"someone");
	bytes[320..330].copy_from_slice(b"2024-01-31");
	bytes[330..338].copy_from_slice(b"12:34:56");
	bytes[338..346].copy_from_slice(&96000u64.to_le_bytes());
	bytes.extend_from_slice(b"A=PCM,F=48000,W=24,M=stereo\r\n\0");
	bytes
}

fn wav_bytes(with_bext: bool) -> Vec<u8> {
	let mut children = chunk(b"fmt ", &fmt_payload(1, 2, 48000, 24));
	children.extend_from_slice(&chunk(b"data", &[0x01, 0x02, 0x03, 0x04]));
	if with_bext {
		children.extend_from_slice(&chunk(b"bext", &bext_payload()));
	}

	let mut payload = b"WAVE".to_vec();
	payload.extend_from_slice(&children);
	chunk(b"RIFF", &payload)
}

fn dummy_bext() -> BextMetadata {
	BextMetadata::decode(&[0; 602], Endianness::Little).unwrap()
}

fn temp_wav(bytes: &[u8]) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(bytes).unwrap();
	file.flush().unwrap();
	file
}

#[test_log::test]
fn typed_leaves_decode() {
	let wav = WavFile::read_from(&mut Cursor::new(wav_bytes(true))).unwrap();

	let fmt = wav.fmt().unwrap();
	assert_eq!(fmt.encoding, WavEncoding::Pcm);
	assert_eq!(fmt.channels, 2);
	assert_eq!(fmt.sample_rate, 48000);
	assert_eq!(fmt.bit_depth, 24);

	assert_eq!(wav.data().unwrap().byte_length, 4);

	let bext = wav.bext().unwrap();
	assert_eq!(bext.originator_text(), "someone");
	assert_eq!(bext.time_reference, 96000);

	assert!(wav.ixml().is_none());
}

#[test_log::test]
fn absent_chunks_answer_none() {
	let wav = WavFile::read_from(&mut Cursor::new(wav_bytes(false))).unwrap();

	assert!(wav.fmt().is_some());
	assert!(wav.bext().is_none());
	assert!(wav.ixml().is_none());
}

#[test_log::test]
fn ixml_text_decodes() {
	let xml = b"<?xml version=\"1.0\"?><BWFXML><PROJECT>demo</PROJECT></BWFXML>";
	let mut children = chunk(b"fmt ", &fmt_payload(1, 1, 44100, 16));
	children.extend_from_slice(&chunk(b"iXML", xml));

	let mut payload = b"WAVE".to_vec();
	payload.extend_from_slice(&children);
	let bytes = chunk(b"RIFF", &payload);

	let wav = WavFile::read_from(&mut Cursor::new(bytes)).unwrap();
	assert_eq!(
		wav.ixml().unwrap().xml,
		String::from_utf8_lossy(xml).into_owned()
	);
}

#[test_log::test]
fn fmt_rewrite_requires_exact_size() {
	let file = temp_wav(&wav_bytes(false));
	let original = std::fs::read(file.path()).unwrap();

	let wav = WavFile::read_from_path(file.path()).unwrap();

	// The chunk on disk is 16 bytes exactly; 4 extra bytes cannot fit
	let mut metadata = wav.fmt().unwrap().clone();
	metadata.extra = Some(vec![0x16, 0x00, 0xAA, 0xBB]);

	let err = wav.write_fmt(&metadata).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::SizeMismatch));
	assert_eq!(std::fs::read(file.path()).unwrap(), original);

	// Matching the existing size again succeeds, and the new field values
	// come back out of a re-parse exactly
	let metadata = FmtMetadata {
		encoding: WavEncoding::IeeeFloat,
		channels: 1,
		sample_rate: 44100,
		bit_depth: 32,
		extra: None,
	};
	wav.write_fmt(&metadata).unwrap();

	let reparsed = WavFile::read_from_path(file.path()).unwrap();
	assert_eq!(reparsed.fmt(), Some(&metadata));

	// Only the rewritten leaf changed; every range and identifier held still
	let before = &wav.riff().chunks()[0];
	let after = &reparsed.riff().chunks()[0];
	assert_eq!(before.chunk_range(), after.chunk_range());
	let (before, after) = (before.children().unwrap(), after.children().unwrap());
	assert_eq!(before.len(), after.len());
	for (before, after) in before.iter().zip(after) {
		assert_eq!(before.id(), after.id());
		assert_eq!(before.chunk_range(), after.chunk_range());
	}
}

#[test_log::test]
fn data_rewrite_reparses_identically() {
	let file = temp_wav(&wav_bytes(true));
	let wav = WavFile::read_from_path(file.path()).unwrap();

	wav.write_data(&[0x0A, 0x0B, 0x0C, 0x0D]).unwrap();

	// The data leaf records only a byte length, so the whole tree compares
	// equal after the rewrite
	let reparsed = WavFile::read_from_path(file.path()).unwrap();
	assert_eq!(wav.riff().chunks(), reparsed.riff().chunks());

	let bytes = std::fs::read(file.path()).unwrap();
	let data_range = wav.chunk(ChunkId::DATA).unwrap().data_range().unwrap();
	assert_eq!(
		&bytes[data_range.start as usize..=data_range.end as usize],
		&[0x0A, 0x0B, 0x0C, 0x0D]
	);
}

#[test_log::test]
fn data_rewrite_rejects_different_size() {
	let file = temp_wav(&wav_bytes(false));
	let original = std::fs::read(file.path()).unwrap();

	let wav = WavFile::read_from_path(file.path()).unwrap();

	let err = wav.write_data(&[0x0A, 0x0B, 0x0C]).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::SizeMismatch));
	assert_eq!(std::fs::read(file.path()).unwrap(), original);
}

#[test_log::test]
fn bext_raw_padding_survives_rewrite() {
	let file = temp_wav(&wav_bytes(true));
	let original = std::fs::read(file.path()).unwrap();

	let wav = WavFile::read_from_path(file.path()).unwrap();

	// Writing the metadata back unmodified must be byte-identical, space
	// padding included
	wav.write_bext(wav.bext().unwrap()).unwrap();
	assert_eq!(std::fs::read(file.path()).unwrap(), original);

	// A targeted edit changes only its own field
	let mut metadata = wav.bext().unwrap().clone();
	metadata.set_originator("someone else");
	wav.write_bext(&metadata).unwrap();

	let reparsed = WavFile::read_from_path(file.path()).unwrap();
	let bext = reparsed.bext().unwrap();
	assert_eq!(bext.originator_text(), "someone else");
	assert_eq!(bext.description, metadata.description);
	assert_eq!(bext.coding_history, metadata.coding_history);
}

#[test_log::test]
fn write_without_target_chunk() {
	let file = temp_wav(&wav_bytes(false));
	let wav = WavFile::read_from_path(file.path()).unwrap();

	let err = wav.write_bext(&dummy_bext()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::MissingChunk("bext")));
}

#[test_log::test]
fn write_without_backing_file() {
	let wav = WavFile::read_from(&mut Cursor::new(wav_bytes(false))).unwrap();

	let err = wav.write_data(&[0; 4]).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::NoBackingFile));
}

#[test_log::test]
fn hound_agrees_on_fmt_fields() {
	let file = NamedTempFile::new().unwrap();

	let spec = hound::WavSpec {
		channels: 2,
		sample_rate: 44100,
		bits_per_sample: 16,
		sample_format: hound::SampleFormat::Int,
	};

	let mut writer = hound::WavWriter::create(file.path(), spec).unwrap();
	for i in 0..200i16 {
		writer.write_sample(i).unwrap();
	}
	writer.finalize().unwrap();

	let wav = WavFile::read_from_path(file.path()).unwrap();

	let fmt = wav.fmt().unwrap();
	assert_eq!(fmt.encoding, WavEncoding::Pcm);
	assert_eq!(fmt.channels, spec.channels);
	assert_eq!(fmt.sample_rate, spec.sample_rate);
	assert_eq!(fmt.bit_depth, spec.bits_per_sample);

	// 200 16-bit samples
	assert_eq!(wav.data().unwrap().byte_length, 400);
}
