use crate::{DisplayMetrics, RawFrame};

/// Row stride alignment the loopback reader applies, in bytes.
pub const ROW_ALIGNMENT: u32 = 64;

/// Byte value written into the stride padding; visible in the output if a
/// consumer fails to crop it.
pub const PADDING_BYTE: u8 = 0xAB;

const PIXEL_STRIDE: u32 = 4;

/// Render one synthetic frame: a position gradient in red/green with the
/// frame counter in blue, padded to the aligned row stride.
pub(super) fn render(metrics: DisplayMetrics, frame_counter: u64) -> RawFrame {
    let tight_row = metrics.width * PIXEL_STRIDE;
    let row_stride = tight_row.next_multiple_of(ROW_ALIGNMENT);

    let mut data = vec![0u8; (row_stride * metrics.height) as usize];

    for y in 0..metrics.height {
        let row = (y * row_stride) as usize;

        for x in 0..metrics.width {
            let index = row + (x * PIXEL_STRIDE) as usize;
            data[index] = (x & 0xFF) as u8;
            data[index + 1] = (y & 0xFF) as u8;
            data[index + 2] = (frame_counter & 0xFF) as u8;
            data[index + 3] = 0xFF;
        }

        for padding in data
            .iter_mut()
            .take(row + row_stride as usize)
            .skip(row + tight_row as usize)
        {
            *padding = PADDING_BYTE;
        }
    }

    RawFrame {
        width: metrics.width,
        height: metrics.height,
        pixel_stride: PIXEL_STRIDE,
        row_stride,
        data: data.into_boxed_slice(),
    }
}
