use winapi::um::errhandlingapi::GetLastError;

/// A failed GDI call together with the thread's last error code at the time.
/// GDI reports failure through null handles or magic return values, so this
/// is the only info we get.
#[derive(Debug)]
pub struct GdiError {
    pub call: &'static str,
    pub code: u32,
}

impl GdiError {
    /// Must be called right after the failing call, before anything else can
    /// overwrite the last error code
    pub(super) fn last(call: &'static str) -> GdiError {
        GdiError {
            call,
            code: unsafe { GetLastError() },
        }
    }
}

pub trait IntoGdiResult: Sized {
    fn into_gdi_result(self, call: &'static str) -> Result<Self, GdiError>;
}

/// GDI handles are raw pointers which are null on failure
impl<T> IntoGdiResult for *mut T {
    fn into_gdi_result(self, call: &'static str) -> Result<Self, GdiError> {
        if self.is_null() {
            Err(GdiError::last(call))
        } else {
            Ok(self)
        }
    }
}
