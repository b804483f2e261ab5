use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regionhist::store::{hist_file_name, query_file, read_batch_linear, write_batch};
use regionhist::{
    build_frame_grid, query_on_frame, FrameView, HistogramBatch, Layout, QuerySpec, RegionGrid,
    COLORS,
};
use std::path::PathBuf;

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("regionhist-{tag}-{}", std::process::id()))
}

fn batch_from_frames(frames: &[Vec<u8>], width: usize, height: usize, regions: usize) -> HistogramBatch {
    let grid = RegionGrid::build(width, height, regions).unwrap();
    let mut batch = HistogramBatch::with_target(frames.len());
    for data in frames {
        let view = FrameView::from_slice(data, width, height).unwrap();
        batch
            .push(build_frame_grid(view, &grid, COLORS).unwrap())
            .unwrap();
    }
    batch
}

#[test]
fn file_names_follow_the_convention() {
    assert_eq!(
        hist_file_name("diff-000117", Layout::RegionBinned, None),
        "diff-000117.hist.reg-binned"
    );
    let codec = regionhist::Identity;
    assert_eq!(
        hist_file_name("diff-000117", Layout::Linear, Some(&codec)),
        "diff-000117.hist.linear.none"
    );
}

#[test]
fn uncompressed_batch_survives_the_disk() {
    let mut rng = StdRng::seed_from_u64(31);
    let frames: Vec<Vec<u8>> = (0..3)
        .map(|_| (0..24 * 24).map(|_| rng.random::<u8>()).collect())
        .collect();
    let batch = batch_from_frames(&frames, 24, 24, 4);

    let dir = scratch_dir("plain");
    let path = write_batch(&dir, "frame-a", &batch, Layout::Linear, None).unwrap();
    assert_eq!(path.file_name().unwrap(), "frame-a.hist.linear");
    assert!(!dir.join("frame-a.hist.linear.tmp").exists());

    let decoded = read_batch_linear(&path, 3, 4, COLORS, None).unwrap();
    assert_eq!(decoded, batch);
    std::fs::remove_dir_all(&dir).ok();
}

#[cfg(feature = "zlib")]
#[test]
fn compressed_file_answers_the_same_query_as_raw_pixels() {
    use regionhist::Zlib;

    let mut rng = StdRng::seed_from_u64(63);
    let data: Vec<u8> = (0..32 * 32).map(|_| rng.random::<u8>() % 32).collect();
    let view = FrameView::from_slice(&data, 32, 32).unwrap();
    let batch = batch_from_frames(std::slice::from_ref(&data), 32, 32, 4);

    let codec = Zlib::default();
    let dir = scratch_dir("zlib");
    let path = write_batch(&dir, "frame-b", &batch, Layout::Linear, Some(&codec)).unwrap();
    assert_eq!(path.file_name().unwrap(), "frame-b.hist.linear.zlib-6");
    assert!(std::fs::metadata(&path).unwrap().len() > 0);

    let spec = QuerySpec::from_regions([(1, 2), (2, 1)]);
    let from_file = query_file(&path, 4, COLORS, Some(&codec), &spec, 10, 0.15).unwrap();
    let from_pixels = query_on_frame(view, 4, &spec, 10, 0.15).unwrap();
    assert_eq!(from_file, from_pixels);

    // Round-trip through the adapter is exact.
    let raw = std::fs::read(&path).unwrap();
    let decoded = read_batch_linear(&path, 1, 4, COLORS, Some(&codec)).unwrap();
    assert_eq!(decoded, batch);
    assert!(raw.len() < regionhist::layout::encoded_size(1, 4, COLORS));
    std::fs::remove_dir_all(&dir).ok();
}
