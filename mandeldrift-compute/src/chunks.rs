use mandeldrift_core::PixelRect;

/// Split the surface into `chunk_count` full-height column ranges, left to
/// right.
///
/// Chunk width is `ceil(width / chunk_count)`, so the last real chunk may be
/// narrower. When the surface is narrower than the chunk count the remaining
/// chunks are empty, which keeps the number of steps per frame fixed.
pub fn generate_column_chunks(width: u32, height: u32, chunk_count: u32) -> Vec<PixelRect> {
    let chunk_count = chunk_count.max(1);
    let chunk_width = width.div_ceil(chunk_count);

    (0..chunk_count)
        .map(|i| {
            let x_start = (i * chunk_width).min(width);
            let x_end = ((i + 1) * chunk_width).min(width);
            PixelRect::new(x_start, 0, x_end - x_start, height)
        })
        .collect()
}
