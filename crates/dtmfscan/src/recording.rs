//! Ogg/Opus recordings.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ogg::writing::PacketWriteEndInfo;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::loader::{AudioError, Waveform};

const OPUS_RATES_HZ: [u32; 5] = [8_000, 12_000, 16_000, 24_000, 48_000];
const GRANULE_RATE_HZ: u64 = 48_000;
const MAX_FRAME_SAMPLES: usize = 5760;
const MAX_PACKET_BYTES: usize = 4000;

/// Encode mono samples as Ogg/Opus with 20 ms frames. The sample rate must
/// be one Opus supports natively.
pub fn write_recording(path: &Path, sample_rate_hz: u32, samples: &[f32]) -> Result<(), AudioError> {
    if !OPUS_RATES_HZ.contains(&sample_rate_hz) {
        return Err(AudioError::Unsupported(format!(
            "Opus cannot encode at {sample_rate_hz} Hz"
        )));
    }
    let frame_len = (sample_rate_hz / 50) as usize;
    let granule_per_sample = GRANULE_RATE_HZ / sample_rate_hz as u64;

    let now = OffsetDateTime::now_utc();
    let serial = (now.unix_timestamp() as u32) ^ now.nanosecond();
    let timestamp = now
        .format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string());

    let mut sink = BufWriter::new(File::create(path)?);
    let mut packets = ogg::writing::PacketWriter::new(&mut sink);
    let comments = [format!("TIMESTAMP={timestamp}")];
    for header in [opus_head(sample_rate_hz, 1), opus_tags("dtmfscan", &comments)] {
        packets.write_packet(header.into_boxed_slice(), serial, PacketWriteEndInfo::EndPage, 0)?;
    }

    let mut encoder =
        opus::Encoder::new(sample_rate_hz, opus::Channels::Mono, opus::Application::Audio)?;
    // An empty input still gets one silent frame so the stream is terminated.
    let frame_count = samples.len().div_ceil(frame_len).max(1);
    let mut frame = vec![0f32; frame_len];
    for i in 0..frame_count {
        let start = (i * frame_len).min(samples.len());
        let chunk = &samples[start..(start + frame_len).min(samples.len())];
        frame[..chunk.len()].copy_from_slice(chunk);
        frame[chunk.len()..].fill(0.0);
        let packet = encoder.encode_vec_float(&frame, MAX_PACKET_BYTES)?;

        let last = i + 1 == frame_count;
        // The final granule position trims the zero padding of the last frame.
        let end_sample = if last { samples.len() } else { (i + 1) * frame_len };
        let info = if last {
            PacketWriteEndInfo::EndStream
        } else {
            PacketWriteEndInfo::NormalPacket
        };
        let granule = end_sample as u64 * granule_per_sample;
        packets.write_packet(packet.into_boxed_slice(), serial, info, granule)?;
    }
    sink.flush()?;
    Ok(())
}

/// Identification header: version 1, no pre-skip, unity gain, mapping family 0.
fn opus_head(sample_rate_hz: u32, channels: u8) -> Vec<u8> {
    [
        b"OpusHead".as_slice(),
        &[1, channels],
        &0u16.to_le_bytes(),
        &sample_rate_hz.to_le_bytes(),
        &0i16.to_le_bytes(),
        &[0],
    ]
    .concat()
}

/// Comment header with a vendor string and `KEY=value` comments.
fn opus_tags(vendor: &str, comments: &[String]) -> Vec<u8> {
    let mut tags = b"OpusTags".to_vec();
    push_length_prefixed(&mut tags, vendor.as_bytes());
    tags.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for comment in comments {
        push_length_prefixed(&mut tags, comment.as_bytes());
    }
    tags
}

fn push_length_prefixed(buf: &mut Vec<u8>, field: &[u8]) {
    buf.extend_from_slice(&(field.len() as u32).to_le_bytes());
    buf.extend_from_slice(field);
}

/// Channel count and input sample rate from an OpusHead packet.
fn parse_opus_head(data: &[u8]) -> Option<(u8, u32)> {
    if data.len() < 19 || !data.starts_with(b"OpusHead") {
        return None;
    }
    let rate = u32::from_le_bytes([data[12], data[13], data[14], data[15]]);
    Some((data[9], rate))
}

/// Decode an Ogg/Opus file. Audio comes back at the original input rate when
/// Opus can produce it directly, otherwise at 48 kHz. The output is cut to the
/// last page's granule position, dropping the final frame's padding.
pub fn read_recording(path: &Path) -> Result<Waveform, AudioError> {
    let mut packets = ogg::reading::PacketReader::new(BufReader::new(File::open(path)?));

    let mut decoder: Option<(opus::Decoder, usize, u32)> = None;
    let mut pcm = Vec::new();
    let mut out = Vec::new();
    let mut end_granule = None;
    while let Some(packet) = packets.read_packet()? {
        if packet.data.starts_with(b"OpusTags") {
            continue;
        }
        if let Some((channels, input_rate)) = parse_opus_head(&packet.data) {
            let rate = if OPUS_RATES_HZ.contains(&input_rate) {
                input_rate
            } else {
                GRANULE_RATE_HZ as u32
            };
            let layout = match channels {
                1 => opus::Channels::Mono,
                2 => opus::Channels::Stereo,
                n => {
                    return Err(AudioError::Unsupported(format!(
                        "{}: {n}-channel Opus streams",
                        path.display()
                    )))
                }
            };
            let channels = channels as usize;
            out = vec![0f32; MAX_FRAME_SAMPLES * channels];
            decoder = Some((opus::Decoder::new(rate, layout)?, channels, rate));
            continue;
        }
        let Some((opus_decoder, channels, _)) = decoder.as_mut() else {
            return Err(AudioError::Unsupported(format!(
                "{}: audio packet before OpusHead",
                path.display()
            )));
        };
        let decoded = opus_decoder.decode_float(&packet.data, &mut out, false)?;
        pcm.extend_from_slice(&out[..decoded * *channels]);
        end_granule = Some(packet.absgp_page());
    }

    match decoder {
        Some((_, channels, rate)) => {
            if let Some(granule) = end_granule {
                let frames = granule / (GRANULE_RATE_HZ / rate as u64);
                pcm.truncate((frames as usize).saturating_mul(channels));
            }
            Ok(Waveform {
                sample_rate_hz: rate,
                channels,
                samples: pcm,
            })
        }
        None => Err(AudioError::Unsupported(format!(
            "{}: no OpusHead packet",
            path.display()
        ))),
    }
}
