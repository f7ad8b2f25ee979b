use sdl2::pixels::PixelFormatEnum;

use viper8::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use viper8::state::FrameBuffer;

const SCALE: usize = 10;

/// # Display
/// The interpreter's output is a 64x32 grid of black/white cells, encoded
/// 1/0 in a 2d array. `render` is only called when the interpreter reports
/// a pending redraw, so the canvas keeps the last frame between calls.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    width: usize,
    height: usize,
}

impl Display {
    /// Creates a new display bound to an sdl2 context, scaled up from the
    /// cell grid by a fixed integer factor.
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window("Viper-8", (DISPLAY_WIDTH * SCALE) as u32, (DISPLAY_HEIGHT * SCALE) as u32)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

        Ok(Display {
            canvas,
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
        })
    }

    /// Formats a frame buffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 RGB24 texture is a 1D array of bytes holding concatenated
    /// rows of RGB pixels, so this:
    /// - flattens the 2D frame buffer by concatenating its rows
    /// - triplicates each cell into identical R, G, and B channels
    /// - multiplies each value by 255 to turn an on/off state into intensity
    fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .flat_map(|cell| std::iter::repeat(cell).take(3))
            .map(|channel| channel * 255)
            .collect()
    }

    /// Converts the frame buffer to an RGB24 texture and presents it.
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, self.width as u32, self.height as u32)
            .map_err(|e| e.to_string())?;

        texture.with_lock(None, |buffer: &mut [u8], _pitch: usize| {
            buffer.copy_from_slice(&Display::frame_to_sdl_texture(frame));
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_sdl_texture_corners() {
        let mut frame: FrameBuffer = [[0; 64]; 32];
        frame[0][63] = 1;
        frame[31][0] = 1;
        let texture = Display::frame_to_sdl_texture(&frame);

        let mut expected: Vec<u8> = vec![0; 6144];
        // Last cell of the first row, first cell of the last row
        expected[189..192].copy_from_slice(&[255, 255, 255]);
        expected[5952..5955].copy_from_slice(&[255, 255, 255]);

        assert_eq!(texture, expected);
    }
}
