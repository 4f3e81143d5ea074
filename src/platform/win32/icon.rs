//! Icon resource to bitmap conversion
//!
//! Loads an icon from a module's resources and copies its pixels into a
//! straight-alpha [`Bitmap`]. No scaling happens here. Every native handle is
//! owned by a guard, so the icon, its colour and mask bitmaps and the memory
//! DC are released on every path.

use windows::core::PCWSTR;
use windows::Win32::Foundation::{GetLastError, HINSTANCE, HMODULE};
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, DeleteDC, DeleteObject, GetDIBits, BITMAPINFO,
    BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HBITMAP, HDC,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    DestroyIcon, GetIconInfo, LoadImageW, HICON, ICONINFO, IMAGE_ICON, LR_DEFAULTSIZE,
};

use crate::domain::entities::bitmap::try_buffer;
use crate::domain::entities::{Bitmap, PixelFormat};
use crate::domain::errors::{DpiError, Result};

struct OwnedIcon(HICON);

impl Drop for OwnedIcon {
    fn drop(&mut self) {
        // SAFETY: the icon came from LoadImageW without LR_SHARED.
        unsafe {
            let _ = DestroyIcon(self.0);
        }
    }
}

struct OwnedBitmap(HBITMAP);

impl Drop for OwnedBitmap {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            // SAFETY: GetIconInfo hands ownership of both bitmaps to the caller.
            unsafe {
                let _ = DeleteObject(self.0);
            }
        }
    }
}

struct MemoryDc(HDC);

impl Drop for MemoryDc {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            // SAFETY: created by CreateCompatibleDC below.
            unsafe {
                let _ = DeleteDC(self.0);
            }
        }
    }
}

fn last_error(function: &'static str) -> DpiError {
    // SAFETY: reads thread-local state set by the last Win32 call.
    let code = unsafe { GetLastError() };
    DpiError::Win32 {
        function,
        code: code.0,
    }
}

fn dib_header(width: i32, height: i32) -> BITMAPINFO {
    BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: height,
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Top-down 32bpp copy of `bitmap`
fn read_pixels(dc: &MemoryDc, bitmap: HBITMAP, width: u32, height: u32) -> Option<Vec<u8>> {
    let mut bmi = dib_header(width as i32, -(height as i32));
    let mut pixels = try_buffer(width as usize * height as usize * 4, 0u8).ok()?;

    // SAFETY: pixels holds exactly width * height 32bpp pixels, matching
    // bmi. The bitmap is never selected into dc.
    let lines = unsafe {
        GetDIBits(
            dc.0,
            bitmap,
            0,
            height,
            Some(pixels.as_mut_ptr() as *mut _),
            &mut bmi,
            DIB_RGB_COLORS,
        )
    };

    (lines > 0).then_some(pixels)
}

/// Load icon `resource_name` from `module` (the executable when `None`)
pub fn load_bitmap_from_icon_resource(module: Option<HMODULE>, resource_name: &str) -> Result<Bitmap> {
    let module = match module {
        Some(m) => m,
        // SAFETY: None returns the executable's own module handle.
        None => unsafe { GetModuleHandleW(None) }.map_err(|_| last_error("GetModuleHandleW"))?,
    };
    let name: Vec<u16> = resource_name.encode_utf16().chain(std::iter::once(0)).collect();

    // SAFETY: name is NUL-terminated and outlives the call.
    let handle = unsafe {
        LoadImageW(
            HINSTANCE(module.0),
            PCWSTR(name.as_ptr()),
            IMAGE_ICON,
            0,
            0,
            LR_DEFAULTSIZE,
        )
    }
    .map_err(|_| last_error("LoadImageW"))?;
    let icon = OwnedIcon(HICON(handle.0));

    let mut info = ICONINFO::default();
    // SAFETY: icon.0 is a valid icon; info is a valid out pointer.
    unsafe { GetIconInfo(icon.0, &mut info) }.map_err(|_| last_error("GetIconInfo"))?;
    let color = OwnedBitmap(info.hbmColor);
    let mask = OwnedBitmap(info.hbmMask);

    if color.0.is_invalid() {
        log!("load_bitmap_from_icon_resource: '{}' has no colour bitmap", resource_name);
        return Err(DpiError::Win32 {
            function: "GetIconInfo",
            code: 0,
        });
    }

    // SAFETY: a null DC asks for one compatible with the screen.
    let dc = MemoryDc(unsafe { CreateCompatibleDC(HDC::default()) });
    if dc.0.is_invalid() {
        return Err(last_error("CreateCompatibleDC"));
    }

    // First call only fills in the header.
    let mut bmi = dib_header(0, 0);
    // SAFETY: no pixel buffer is passed, GetDIBits only writes bmi.
    unsafe { GetDIBits(dc.0, color.0, 0, 0, None, &mut bmi, DIB_RGB_COLORS) };
    let width = bmi.bmiHeader.biWidth.unsigned_abs();
    let height = bmi.bmiHeader.biHeight.unsigned_abs();
    if width == 0 || height == 0 {
        return Err(last_error("GetDIBits"));
    }

    let mut pixels = read_pixels(&dc, color.0, width, height).ok_or_else(|| last_error("GetDIBits"))?;

    // Icons without an alpha channel carry transparency in the mask instead.
    let has_alpha = pixels.iter().skip(3).step_by(4).any(|&a| a > 0);
    if !has_alpha {
        let mask_pixels = if mask.0.is_invalid() {
            None
        } else {
            read_pixels(&dc, mask.0, width, height)
        };
        for (i, px) in pixels.chunks_exact_mut(4).enumerate() {
            // Black in the mask is opaque.
            let opaque = mask_pixels.as_ref().map_or(true, |m| m[i * 4] == 0);
            px[3] = if opaque { 255 } else { 0 };
        }
    }

    log!("load_bitmap_from_icon_resource: '{}' is {}x{}", resource_name, width, height);
    Bitmap::from_pixels(width, height, PixelFormat::Bgra32, pixels)
}
