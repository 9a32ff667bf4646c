//! TRC trajectory format support
//!
//! Writes the tab separated, CRLF terminated `PathFileType 4 (X/Y/Z)`
//! layout read by OpenSim. Downstream parsers are strict about the layout,
//! so tab positions (including the trailing tabs of the two column header
//! lines) and decimal precision are fixed.

use meshtrc_core::{Error, MarkerFrame, MarkerVertexMap, Result, TrajectorySet};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Extension of trajectory output files
pub const TRC_EXTENSION: &str = "trc";

const LINE_END: &str = "\r\n";

/// TRC writer implementation
pub struct TrcWriter;

impl TrcWriter {
    /// Write per-frame marker positions to a TRC file
    pub fn write_file<P: AsRef<Path>>(
        path: P,
        markers: &MarkerVertexMap,
        frames: &[MarkerFrame],
        sampling_rate: f64,
    ) -> Result<()> {
        let path = path.as_ref();
        validate_rate(sampling_rate)?;

        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut writer = BufWriter::new(file);
        let label = path.display().to_string();
        Self::write_to(&mut writer, &label, markers, frames, sampling_rate)
            .and_then(|_| writer.flush())
            .map_err(|e| Error::io(path, e))?;

        info!("TRC file saved to {}", path.display());
        Ok(())
    }

    /// Write all trajectories of a trial to a TRC file
    pub fn write_trajectories<P: AsRef<Path>>(
        path: P,
        markers: &MarkerVertexMap,
        trajectories: &TrajectorySet,
        sampling_rate: f64,
    ) -> Result<()> {
        Self::write_file(path, markers, &trajectories.frames(), sampling_rate)
    }

    /// Write the TRC layout into any writer. `path_label` fills the
    /// path field of the first header line.
    pub fn write_to<W: Write>(
        writer: &mut W,
        path_label: &str,
        markers: &MarkerVertexMap,
        frames: &[MarkerFrame],
        sampling_rate: f64,
    ) -> io::Result<()> {
        let num_frames = frames.len();
        let num_markers = markers.len();

        write!(writer, "PathFileType\t4\t(X/Y/Z)\t{}{}", path_label, LINE_END)?;
        write!(
            writer,
            "DataRate\tCameraRate\tNumFrames\tNumMarkers\tUnits\tOrigDataRate\tOrigDataStartFrame\tOrigNumFrames{}",
            LINE_END
        )?;
        write!(
            writer,
            "{rate:.6}\t{rate:.6}\t{num_frames}\t{num_markers}\tm\t{rate:.6}\t1\t{num_frames}{LINE_END}",
            rate = sampling_rate,
        )?;

        write!(writer, "Frame#\tTime\t")?;
        for name in markers.names() {
            write!(writer, "{}\t\t\t", name)?;
        }
        write!(writer, "{}", LINE_END)?;

        write!(writer, "\t\t")?;
        for i in 1..=num_markers {
            write!(writer, "X{i}\tY{i}\tZ{i}\t")?;
        }
        write!(writer, "{}", LINE_END)?;

        for (frame_idx, frame) in frames.iter().enumerate() {
            let time = frame_idx as f64 / sampling_rate;
            let mut row = Vec::with_capacity(2 + 3 * num_markers);
            row.push((frame_idx + 1).to_string());
            row.push(format!("{:.5}", time));
            for name in markers.names() {
                match frame.get(name) {
                    Some(p) => row.extend([format_coord(p.x), format_coord(p.y), format_coord(p.z)]),
                    None => row.extend(std::iter::repeat("nan".to_string()).take(3)),
                }
            }
            write!(writer, "{}{}", row.join("\t"), LINE_END)?;
        }

        Ok(())
    }
}

fn validate_rate(sampling_rate: f64) -> Result<()> {
    if sampling_rate.is_finite() && sampling_rate > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidData(format!(
            "Sampling rate must be a positive number, got {}",
            sampling_rate
        )))
    }
}

/// Five decimals; NaN is spelled `nan`
fn format_coord(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.5}", value)
    }
}
