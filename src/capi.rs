//! C ABI boundary for the credential-helper program.
//!
//! Exposes the four keychain operations with a plain C calling convention:
//! every function returns `NULL` on success or a heap-allocated
//! error-message string on failure, and every string or array handed to the
//! caller transfers ownership and must be released exactly once through the
//! companion free function.
//!
//! Ownership contract:
//!
//! - error strings and the `keychain_get` outputs are freed one at a time
//!   with [`keychain_string_free`]
//! - the two parallel arrays produced by [`keychain_list`] are freed as a
//!   unit with [`keychain_list_free`]
//!
//! All allocations cross the boundary as `CString`/boxed-slice buffers, so
//! the matching free functions must be the ones exported here; mixing in
//! the C library's `free` is undefined behavior.

#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

use crate::credential::Credential;
use crate::error::Error;
use crate::keychain::Keychain;
use crate::protocol::Protocol;
use crate::server::Server;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_uint};
use std::ptr;

/// Server key as passed across the C boundary.
///
/// `proto` is the raw `SecProtocolType` FourCC code. A null `path` is
/// treated as the empty path; `host` must be non-null.
#[repr(C)]
pub struct KeychainServer {
    /// Null-terminated host string. Required.
    pub host: *const c_char,
    /// Null-terminated path string, or null for no path.
    pub path: *const c_char,
    /// Port; zero means unset.
    pub port: u16,
    /// Raw `SecProtocolType` FourCC code.
    pub proto: u32,
}

/// Convert an error into a caller-owned C string.
fn into_error_pointer(err: &Error) -> *mut c_char {
    let sanitized = err.to_string().replace('\0', " ");
    CString::new(sanitized).map_or(ptr::null_mut(), CString::into_raw)
}

/// Copy a required C string argument into owned Rust data.
///
/// # Safety
///
/// `pointer`, when non-null, must point at a valid null-terminated string.
unsafe fn required_string(pointer: *const c_char, what: &str) -> Result<String, Error> {
    if pointer.is_null() {
        return Err(Error::invalid_input(format!("{what} is null")));
    }
    // SAFETY: caller guarantees a valid null-terminated string.
    let bytes = unsafe { CStr::from_ptr(pointer) };
    bytes
        .to_str()
        .map(ToOwned::to_owned)
        .map_err(|_| Error::invalid_input(format!("{what} is not valid UTF-8")))
}

/// Copy an optional C string argument, treating null as empty.
///
/// # Safety
///
/// `pointer`, when non-null, must point at a valid null-terminated string.
unsafe fn optional_string(pointer: *const c_char, what: &str) -> Result<String, Error> {
    if pointer.is_null() {
        return Ok(String::new());
    }
    // SAFETY: caller guarantees a valid null-terminated string.
    unsafe { required_string(pointer, what) }
}

/// Build a [`Server`] from the raw C struct.
///
/// # Safety
///
/// `raw`, when non-null, must point at a valid [`KeychainServer`] whose
/// string fields satisfy the `required_string`/`optional_string` contracts.
unsafe fn server_from_raw(raw: *const KeychainServer) -> Result<Server, Error> {
    // SAFETY: caller guarantees raw is null or valid.
    let Some(raw) = (unsafe { raw.as_ref() }) else {
        return Err(Error::invalid_input("server is null"));
    };
    // SAFETY: field pointers come from the caller-provided struct.
    let host = unsafe { required_string(raw.host, "server host")? };
    // SAFETY: same contract as above.
    let path = unsafe { optional_string(raw.path, "server path")? };
    Ok(Server::new(host, Protocol::from_code(raw.proto))
        .with_path(path)
        .with_port(raw.port))
}

fn open_keychain() -> Result<Keychain, Error> {
    Keychain::new().ok_or(Error::NotAvailable)
}

/// Move a vector of C strings into a caller-owned array.
///
/// The returned pointer came from a boxed slice of exactly `strings.len()`
/// elements; it must be released with [`string_array_free`] using the same
/// count.
fn string_array_into_raw(strings: Vec<CString>) -> *mut *mut c_char {
    let pointers: Box<[*mut c_char]> = strings.into_iter().map(CString::into_raw).collect();
    Box::into_raw(pointers).cast::<*mut c_char>()
}

/// Free an array produced by [`string_array_into_raw`].
///
/// # Safety
///
/// `array` must be null or a pointer previously returned by
/// `string_array_into_raw` for exactly `count` strings, not freed before.
unsafe fn string_array_free(array: *mut *mut c_char, count: usize) {
    if array.is_null() {
        return;
    }
    // SAFETY: the array was created from a boxed slice of `count` elements;
    // reconstituting it gives each contained CString back to Rust exactly
    // once.
    unsafe {
        let slice = ptr::slice_from_raw_parts_mut(array, count);
        let pointers = Box::from_raw(slice);
        for &pointer in pointers.iter() {
            if !pointer.is_null() {
                drop(CString::from_raw(pointer));
            }
        }
    }
}

/// Store a credential: insert the internet-password item and label it.
///
/// Returns `NULL` on success, or a caller-owned error string to be released
/// with [`keychain_string_free`].
///
/// # Safety
///
/// `server` must satisfy the [`KeychainServer`] contract; `label`,
/// `username`, and `secret` must be valid null-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn keychain_add(
    server: *const KeychainServer,
    label: *const c_char,
    username: *const c_char,
    secret: *const c_char,
) -> *mut c_char {
    let result = (|| {
        // SAFETY: forwarded caller contract.
        let server = unsafe { server_from_raw(server)? };
        // SAFETY: forwarded caller contract.
        let label = unsafe { required_string(label, "label")? };
        // SAFETY: forwarded caller contract.
        let username = unsafe { required_string(username, "username")? };
        // SAFETY: forwarded caller contract.
        let secret = unsafe { required_string(secret, "secret")? };
        open_keychain()?.add(&server, &label, &Credential::new(username, secret))
    })();

    match result {
        Ok(()) => ptr::null_mut(),
        Err(err) => into_error_pointer(&err),
    }
}

/// Fetch the credential stored for a server key.
///
/// On success writes caller-owned strings into `username` and `secret`
/// (each released individually with [`keychain_string_free`]) and returns
/// `NULL`. On failure the out-parameters are left untouched and a
/// caller-owned error string is returned.
///
/// # Safety
///
/// `server` must satisfy the [`KeychainServer`] contract; `username` and
/// `secret` must be valid non-null out-pointers.
#[no_mangle]
pub unsafe extern "C" fn keychain_get(
    server: *const KeychainServer,
    username: *mut *mut c_char,
    secret: *mut *mut c_char,
) -> *mut c_char {
    if username.is_null() || secret.is_null() {
        return into_error_pointer(&Error::invalid_input("output pointer is null"));
    }

    let result = (|| {
        // SAFETY: forwarded caller contract.
        let server = unsafe { server_from_raw(server)? };
        let credential = open_keychain()?.get(&server)?;
        let username_c = CString::new(credential.username().replace('\0', " "))
            .map_err(|_| Error::invalid_input("username contains interior nul"))?;
        let secret_c = CString::new(credential.secret().replace('\0', " "))
            .map_err(|_| Error::invalid_input("secret contains interior nul"))?;
        Ok::<_, Error>((username_c, secret_c))
    })();

    match result {
        Ok((username_c, secret_c)) => {
            // SAFETY: both out-pointers were checked non-null above.
            unsafe {
                *username = username_c.into_raw();
                *secret = secret_c.into_raw();
            }
            ptr::null_mut()
        }
        Err(err) => into_error_pointer(&err),
    }
}

/// Delete the item stored for a server key.
///
/// Returns `NULL` on success, or a caller-owned error string to be released
/// with [`keychain_string_free`].
///
/// # Safety
///
/// `server` must satisfy the [`KeychainServer`] contract.
#[no_mangle]
pub unsafe extern "C" fn keychain_delete(server: *const KeychainServer) -> *mut c_char {
    let result = (|| {
        // SAFETY: forwarded caller contract.
        let server = unsafe { server_from_raw(server)? };
        open_keychain()?.delete(&server)
    })();

    match result {
        Ok(()) => ptr::null_mut(),
        Err(err) => into_error_pointer(&err),
    }
}

/// Enumerate items carrying a label.
///
/// On success writes two caller-owned parallel arrays (display URLs and
/// accounts) plus their shared length, and returns `NULL`. The arrays and
/// every contained string must be released exactly once as a unit with
/// [`keychain_list_free`]. On failure the out-parameters are left untouched
/// and a caller-owned error string is returned.
///
/// # Safety
///
/// `label` must be a valid null-terminated string; `urls`, `accounts`, and
/// `count` must be valid non-null out-pointers.
#[no_mangle]
pub unsafe extern "C" fn keychain_list(
    label: *const c_char,
    urls: *mut *mut *mut c_char,
    accounts: *mut *mut *mut c_char,
    count: *mut c_uint,
) -> *mut c_char {
    if urls.is_null() || accounts.is_null() || count.is_null() {
        return into_error_pointer(&Error::invalid_input("output pointer is null"));
    }

    let result = (|| {
        // SAFETY: forwarded caller contract.
        let label = unsafe { required_string(label, "label")? };
        let entries = open_keychain()?.list(&label)?;

        let length = c_uint::try_from(entries.len())
            .map_err(|_| Error::invalid_input("listing is too large"))?;

        let mut url_strings = Vec::with_capacity(entries.len());
        let mut account_strings = Vec::with_capacity(entries.len());
        for entry in entries {
            url_strings.push(
                CString::new(entry.url.replace('\0', " "))
                    .map_err(|_| Error::invalid_input("url contains interior nul"))?,
            );
            account_strings.push(
                CString::new(entry.account.replace('\0', " "))
                    .map_err(|_| Error::invalid_input("account contains interior nul"))?,
            );
        }
        Ok::<_, Error>((url_strings, account_strings, length))
    })();

    match result {
        Ok((url_strings, account_strings, length)) => {
            // SAFETY: all three out-pointers were checked non-null above.
            unsafe {
                *urls = string_array_into_raw(url_strings);
                *accounts = string_array_into_raw(account_strings);
                *count = length;
            }
            ptr::null_mut()
        }
        Err(err) => into_error_pointer(&err),
    }
}

/// Free the parallel arrays produced by a successful [`keychain_list`].
///
/// Must be called exactly once per successful `keychain_list`; both arrays
/// and every contained string are released as a unit.
///
/// # Safety
///
/// `urls` and `accounts` must be the pointers written by one successful
/// `keychain_list` call with the matching `count`, not freed before. Null
/// pointers are ignored.
#[no_mangle]
pub unsafe extern "C" fn keychain_list_free(
    urls: *mut *mut c_char,
    accounts: *mut *mut c_char,
    count: c_uint,
) {
    // SAFETY: forwarded caller contract.
    unsafe {
        string_array_free(urls, count as usize);
        string_array_free(accounts, count as usize);
    }
}

/// Free a single string returned by this API (error messages and the
/// `keychain_get` outputs).
///
/// # Safety
///
/// `string` must be null or a string pointer returned by this API, not
/// freed before.
#[no_mangle]
pub unsafe extern "C" fn keychain_string_free(string: *mut c_char) {
    if !string.is_null() {
        // SAFETY: the pointer came from CString::into_raw in this module.
        unsafe {
            drop(CString::from_raw(string));
        }
    }
}
