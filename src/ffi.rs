//! C ABI for embedding the view in the native host.
//!
//! The host passes a table of callbacks that implement the outbound bridge calls. Strings the
//! host returns from callbacks are copied and then handed back through `release_string`.
//! Strings returned by this library must be freed with [`bv_free_string`].

use crate::adapter::BridgeAdapter;
use crate::bridge::HostBridge;
use crate::config::ViewConfig;
use crate::view::TransferForm;
use crate::ViewError;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};

pub const BV_OK: c_int = 0;
pub const BV_ERR_NULL_POINTER: c_int = -1;
pub const BV_ERR_INVALID_UTF8: c_int = -2;
pub const BV_ERR_DECODE: c_int = -3;
pub const BV_ERR_UNKNOWN_EVENT: c_int = -4;
pub const BV_ERR_VALIDATION: c_int = -5;
pub const BV_ERR_UNKNOWN_STATE: c_int = -6;
pub const BV_ERR_BRIDGE_CALL: c_int = -7;
pub const BV_ERR_OTHER: c_int = -8;

pub type FlagCallback = extern "C" fn(user_data: *mut c_void) -> bool;
pub type TextCallback = extern "C" fn(user_data: *mut c_void) -> *mut c_char;
pub type TransferCallback =
    extern "C" fn(user_data: *mut c_void, request_json: *const c_char) -> *mut c_char;
pub type MessageCallback = extern "C" fn(user_data: *mut c_void, text: *const c_char);
pub type ReleaseCallback = extern "C" fn(user_data: *mut c_void, text: *mut c_char);

/// Outbound calls supplied by the host. A missing callback behaves as a failed call.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HostCallbacks {
    pub user_data: *mut c_void,
    pub open_wallet: Option<FlagCallback>,
    pub generate_wallet: Option<FlagCallback>,
    pub close_wallet: Option<FlagCallback>,
    pub transfer: Option<TransferCallback>,
    pub request_aliases: Option<TextCallback>,
    pub message_box: Option<MessageCallback>,
    pub get_version: Option<TextCallback>,
    pub release_string: Option<ReleaseCallback>,
}

pub struct CallbackBridge {
    callbacks: HostCallbacks,
}

impl CallbackBridge {
    fn flag(&self, callback: Option<FlagCallback>) -> bool {
        callback.map_or(false, |f| f(self.callbacks.user_data))
    }

    fn take_string(&self, ptr: *mut c_char) -> String {
        if ptr.is_null() {
            return String::new();
        }
        let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        if let Some(release) = self.callbacks.release_string {
            release(self.callbacks.user_data, ptr);
        }
        text
    }

    fn text(&self, callback: Option<TextCallback>) -> String {
        match callback {
            Some(f) => self.take_string(f(self.callbacks.user_data)),
            None => String::new(),
        }
    }
}

impl HostBridge for CallbackBridge {
    fn open_wallet(&self) -> bool {
        self.flag(self.callbacks.open_wallet)
    }

    fn generate_wallet(&self) -> bool {
        self.flag(self.callbacks.generate_wallet)
    }

    fn close_wallet(&self) -> bool {
        self.flag(self.callbacks.close_wallet)
    }

    fn transfer(&self, request_json: &str) -> String {
        let (Some(f), Ok(request)) = (self.callbacks.transfer, CString::new(request_json)) else {
            return String::new();
        };
        self.take_string(f(self.callbacks.user_data, request.as_ptr()))
    }

    fn request_aliases(&self) -> String {
        self.text(self.callbacks.request_aliases)
    }

    fn message_box(&self, text: &str) {
        let Some(f) = self.callbacks.message_box else {
            return;
        };
        match CString::new(text) {
            Ok(text) => f(self.callbacks.user_data, text.as_ptr()),
            Err(e) => tracing::warn!("message box text has an interior nul: {}", e),
        }
    }

    fn get_version(&self) -> String {
        self.text(self.callbacks.get_version)
    }
}

/// Owns the adapter and the runtime its dismiss timer runs on.
pub struct ViewHandle {
    adapter: BridgeAdapter<CallbackBridge>,
    // Declared last so the adapter, and its pending timer, go first.
    _runtime: tokio::runtime::Runtime,
}

fn status_of(err: &ViewError) -> c_int {
    match err {
        ViewError::Decode { .. } => BV_ERR_DECODE,
        ViewError::UnknownEvent(_) => BV_ERR_UNKNOWN_EVENT,
        ViewError::Validation(_) => BV_ERR_VALIDATION,
        ViewError::UnknownState { .. } => BV_ERR_UNKNOWN_STATE,
        ViewError::BridgeCall { .. } => BV_ERR_BRIDGE_CALL,
        ViewError::Config(_) => BV_ERR_OTHER,
    }
}

fn status(result: Result<(), ViewError>) -> c_int {
    match result {
        Ok(()) => BV_OK,
        Err(e) => status_of(&e),
    }
}

fn c_str<'a>(ptr: *const c_char) -> Result<&'a str, c_int> {
    if ptr.is_null() {
        return Err(BV_ERR_NULL_POINTER);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| BV_ERR_INVALID_UTF8)
}

fn handle_mut<'a>(handle: *mut ViewHandle) -> Result<&'a mut ViewHandle, c_int> {
    unsafe { handle.as_mut() }.ok_or(BV_ERR_NULL_POINTER)
}

/// Creates a view. Returns null if `callbacks` is null or the runtime cannot start.
#[no_mangle]
pub extern "C" fn bv_view_new(callbacks: *const HostCallbacks) -> *mut ViewHandle {
    let Some(callbacks) = (unsafe { callbacks.as_ref() }) else {
        return std::ptr::null_mut();
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("bv-timer")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to start runtime: {}", e);
            return std::ptr::null_mut();
        }
    };

    let bridge = CallbackBridge {
        callbacks: *callbacks,
    };
    let adapter =
        BridgeAdapter::with_runtime(bridge, ViewConfig::default(), runtime.handle().clone());
    Box::into_raw(Box::new(ViewHandle {
        adapter,
        _runtime: runtime,
    }))
}

#[no_mangle]
pub extern "C" fn bv_view_free(handle: *mut ViewHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(handle));
    }
}

#[no_mangle]
pub extern "C" fn bv_view_start(handle: *mut ViewHandle) -> c_int {
    match handle_mut(handle) {
        Ok(view) => {
            view.adapter.start();
            BV_OK
        }
        Err(code) => code,
    }
}

#[no_mangle]
pub extern "C" fn bv_view_dispatch(
    handle: *mut ViewHandle,
    event: *const c_char,
    payload: *const c_char,
) -> c_int {
    let view = match handle_mut(handle) {
        Ok(view) => view,
        Err(code) => return code,
    };
    let event = match c_str(event) {
        Ok(event) => event,
        Err(code) => return code,
    };
    // Payload-less events may pass null.
    let payload = if payload.is_null() {
        ""
    } else {
        match c_str(payload) {
            Ok(payload) => payload,
            Err(code) => return code,
        }
    };
    status(view.adapter.handle(event, payload))
}

/// Sends a transfer from a JSON form `{address, amount, payment_id, mixin_count, fee}`.
#[no_mangle]
pub extern "C" fn bv_view_transfer(handle: *mut ViewHandle, form_json: *const c_char) -> c_int {
    let view = match handle_mut(handle) {
        Ok(view) => view,
        Err(code) => return code,
    };
    let form_json = match c_str(form_json) {
        Ok(text) => text,
        Err(code) => return code,
    };
    let form: TransferForm = match serde_json::from_str(form_json) {
        Ok(form) => form,
        Err(e) => {
            tracing::error!("failed to decode transfer form: {}", e);
            return BV_ERR_DECODE;
        }
    };
    status(view.adapter.transfer(form).map(|_| ()))
}

#[no_mangle]
pub extern "C" fn bv_view_open_wallet(handle: *mut ViewHandle) -> c_int {
    match handle_mut(handle) {
        Ok(view) => status(view.adapter.open_wallet()),
        Err(code) => code,
    }
}

#[no_mangle]
pub extern "C" fn bv_view_generate_wallet(handle: *mut ViewHandle) -> c_int {
    match handle_mut(handle) {
        Ok(view) => status(view.adapter.generate_wallet()),
        Err(code) => code,
    }
}

#[no_mangle]
pub extern "C" fn bv_view_close_wallet(handle: *mut ViewHandle) -> c_int {
    match handle_mut(handle) {
        Ok(view) => status(view.adapter.close_wallet()),
        Err(code) => code,
    }
}

/// Current view state as JSON. Null on a null handle. Free with [`bv_free_string`].
#[no_mangle]
pub extern "C" fn bv_view_state_json(handle: *const ViewHandle) -> *mut c_char {
    let Some(view) = (unsafe { handle.as_ref() }) else {
        return std::ptr::null_mut();
    };
    match view.adapter.state_json().map(CString::new) {
        Ok(Ok(json)) => json.into_raw(),
        Ok(Err(e)) => {
            tracing::error!("state json contains a nul byte: {}", e);
            std::ptr::null_mut()
        }
        Err(e) => {
            tracing::error!("failed to serialize view state: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Autocomplete tags for `input` as a JSON array of strings. Empty until the alias list has
/// loaded. Null on a null handle or input. Free with [`bv_free_string`].
#[no_mangle]
pub extern "C" fn bv_view_alias_suggestions(
    handle: *const ViewHandle,
    input: *const c_char,
) -> *mut c_char {
    let Some(view) = (unsafe { handle.as_ref() }) else {
        return std::ptr::null_mut();
    };
    let Ok(input) = c_str(input) else {
        return std::ptr::null_mut();
    };
    match serde_json::to_string(&view.adapter.alias_suggestions(input)).map(CString::new) {
        Ok(Ok(json)) => json.into_raw(),
        Ok(Err(e)) => {
            tracing::error!("suggestions contain a nul byte: {}", e);
            std::ptr::null_mut()
        }
        Err(e) => {
            tracing::error!("failed to serialize suggestions: {}", e);
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn bv_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(ptr));
    }
}
