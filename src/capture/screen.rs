//! Screen region capture using Win32 GDI.
//!
//! Copies the requested rectangle of the desktop into a memory bitmap with
//! `BitBlt` and reads it back as top-down 32-bit BGRA, converted to RGBA.

use image::RgbaImage;

use super::{CaptureBackend, CaptureError, FrameSource};
use crate::calibration::CaptureRegion;

/// The desktop capture backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenCapture;

impl CaptureBackend for ScreenCapture {
    fn open(&self) -> Result<Box<dyn FrameSource>, CaptureError> {
        let session = gdi::GdiSession::open()?;
        crate::log("Capture: screen session opened");
        Ok(Box::new(session))
    }
}

/// Converts a BGRA buffer (4 bytes per pixel, rows packed) to an RGBA image.
fn bgra_to_rgba(width: u32, height: u32, mut data: Vec<u8>) -> Result<RgbaImage, CaptureError> {
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
        // GDI leaves alpha undefined for screen copies.
        px[3] = 255;
    }
    RgbaImage::from_raw(width, height, data).ok_or_else(|| {
        CaptureError::Frame(format!("Pixel buffer does not match {}x{}", width, height))
    })
}

/// GDI dimensions of a region: `(left, top, width, height)` as `i32` plus
/// the BGRA buffer length. Fails when a hand-edited region does not fit.
#[cfg_attr(not(windows), allow(dead_code))]
fn frame_geometry(region: &CaptureRegion) -> Result<([i32; 4], usize), CaptureError> {
    let too_large = || CaptureError::Frame(format!("Region {} is too large to capture", region));

    let to_i32 = |v: u32| i32::try_from(v).map_err(|_| too_large());
    let dims = [
        to_i32(region.left())?,
        to_i32(region.top())?,
        to_i32(region.width())?,
        to_i32(region.height())?,
    ];

    let len = (region.width() as usize)
        .checked_mul(region.height() as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(too_large)?;

    Ok((dims, len))
}

#[cfg(windows)]
mod gdi {
    use image::RgbaImage;
    use std::ffi::c_void;

    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
        GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
        DIB_RGB_COLORS, HDC, SRCCOPY,
    };

    use super::{bgra_to_rgba, frame_geometry, CaptureError, FrameSource};
    use crate::calibration::CaptureRegion;

    /// Screen DC plus a compatible memory DC, held for the loop's lifetime.
    pub struct GdiSession {
        screen_dc: HDC,
        memory_dc: HDC,
    }

    impl GdiSession {
        pub fn open() -> Result<Self, CaptureError> {
            unsafe {
                let screen_dc = GetDC(HWND::default());
                if screen_dc.is_invalid() {
                    return Err(CaptureError::Unavailable(
                        "Failed to get screen device context".to_string(),
                    ));
                }

                let memory_dc = CreateCompatibleDC(screen_dc);
                if memory_dc.is_invalid() {
                    ReleaseDC(HWND::default(), screen_dc);
                    return Err(CaptureError::Unavailable(
                        "Failed to create memory device context".to_string(),
                    ));
                }

                Ok(Self {
                    screen_dc,
                    memory_dc,
                })
            }
        }
    }

    impl FrameSource for GdiSession {
        fn capture(&mut self, region: &CaptureRegion) -> Result<RgbaImage, CaptureError> {
            let ([left, top, width, height], len) = frame_geometry(region)?;

            unsafe {
                let bitmap = CreateCompatibleBitmap(self.screen_dc, width, height);
                if bitmap.is_invalid() {
                    return Err(CaptureError::Frame(format!(
                        "Failed to create {}x{} bitmap",
                        width, height
                    )));
                }
                let previous = SelectObject(self.memory_dc, bitmap);

                let blit = BitBlt(
                    self.memory_dc,
                    0,
                    0,
                    width,
                    height,
                    self.screen_dc,
                    left,
                    top,
                    SRCCOPY,
                );

                let mut info = BITMAPINFO {
                    bmiHeader: BITMAPINFOHEADER {
                        biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                        biWidth: width,
                        // Negative height requests top-down rows.
                        biHeight: -height,
                        biPlanes: 1,
                        biBitCount: 32,
                        biCompression: BI_RGB.0,
                        ..Default::default()
                    },
                    ..Default::default()
                };
                let mut data = vec![0u8; len];

                let lines = if blit.is_ok() {
                    GetDIBits(
                        self.memory_dc,
                        bitmap,
                        0,
                        height as u32,
                        Some(data.as_mut_ptr() as *mut c_void),
                        &mut info,
                        DIB_RGB_COLORS,
                    )
                } else {
                    0
                };

                SelectObject(self.memory_dc, previous);
                let _ = DeleteObject(bitmap);

                if let Err(e) = blit {
                    return Err(CaptureError::Frame(format!("BitBlt failed: {}", e)));
                }
                if lines != height {
                    return Err(CaptureError::Frame(format!(
                        "GetDIBits copied {} of {} lines",
                        lines, height
                    )));
                }

                bgra_to_rgba(region.width(), region.height(), data)
            }
        }
    }

    impl Drop for GdiSession {
        fn drop(&mut self) {
            unsafe {
                let _ = DeleteDC(self.memory_dc);
                ReleaseDC(HWND::default(), self.screen_dc);
            }
            crate::log("Capture: screen session released");
        }
    }
}

#[cfg(not(windows))]
mod gdi {
    use image::RgbaImage;

    use super::{CaptureError, FrameSource};
    use crate::calibration::CaptureRegion;

    const UNSUPPORTED: &str = "screen capture is only supported on Windows";

    pub struct GdiSession;

    impl GdiSession {
        pub fn open() -> Result<Self, CaptureError> {
            Err(CaptureError::Unavailable(UNSUPPORTED.to_string()))
        }
    }

    impl FrameSource for GdiSession {
        fn capture(&mut self, _region: &CaptureRegion) -> Result<RgbaImage, CaptureError> {
            Err(CaptureError::Unavailable(UNSUPPORTED.to_string()))
        }
    }
}
