//! FFI bindings for Security.framework keychain operations.
//!
//! This module provides low-level bindings to Apple's Keychain Services
//! for internet-password items. All unsafe code is quarantined here.
//!
//! # Safety
//!
//! This module uses `unsafe` for FFI calls. All bindings are verified
//! against Apple's Security.framework documentation. Every CF object
//! obtained under the create rule is wrapped in an RAII type and released
//! exactly once.
//!
//! # References
//!
//! - [Keychain Services](https://developer.apple.com/documentation/security/keychain_services)
//! - [SecItemCopyMatching](https://developer.apple.com/documentation/security/1398306-secitemcopymatching)

#![allow(unsafe_code)]

use crate::error::{Error, Result, UNKNOWN_ERROR_MESSAGE};
use crate::listing::ItemAttributes;
use crate::server::Server;
use core_foundation::array::CFArray;
use core_foundation::base::{CFType, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use core_foundation_sys::base::{CFRelease, CFTypeRef};
use core_foundation_sys::dictionary::CFDictionaryRef;
use core_foundation_sys::string::CFStringRef;
use std::ffi::c_void;
use std::os::raw::c_char;
use std::ptr;

/// OSStatus as returned by every Security.framework call.
type OsStatus = i32;

/// Opaque keychain item reference (a CF object).
type SecKeychainItemRef = *mut c_void;

const ERR_SEC_SUCCESS: OsStatus = 0;

// Keychain item attribute tags (SecItemAttr FourCC codes).
const LABEL_ITEM_ATTR: u32 = four_char_code(*b"labl");
const ACCOUNT_ITEM_ATTR: u32 = four_char_code(*b"acct");

// SecAuthenticationType values are byte-swapped on little-endian targets
// (see SecKeychain.h). kSecAuthenticationTypeDefault is 'dflt'.
#[cfg(target_endian = "little")]
const AUTHENTICATION_TYPE_DEFAULT: u32 = four_char_code(*b"tlfd");
#[cfg(target_endian = "big")]
const AUTHENTICATION_TYPE_DEFAULT: u32 = four_char_code(*b"dflt");

// Attribute dictionary keys as returned by SecItemCopyMatching.
const ATTR_KEY_PROTOCOL: &str = "ptcl";
const ATTR_KEY_SERVER: &str = "srvr";
const ATTR_KEY_PATH: &str = "path";
const ATTR_KEY_PORT: &str = "port";
const ATTR_KEY_ACCOUNT: &str = "acct";

const fn four_char_code(code: [u8; 4]) -> u32 {
    u32::from_be_bytes(code)
}

/// `SecKeychainAttribute` from SecBase.h.
#[repr(C)]
struct SecKeychainAttribute {
    tag: u32,
    length: u32,
    data: *mut c_void,
}

/// `SecKeychainAttributeList` from SecBase.h.
#[repr(C)]
struct SecKeychainAttributeList {
    count: u32,
    attr: *mut SecKeychainAttribute,
}

#[link(name = "Security", kind = "framework")]
extern "C" {
    fn SecKeychainAddInternetPassword(
        keychain: *mut c_void,
        server_name_length: u32,
        server_name: *const c_char,
        security_domain_length: u32,
        security_domain: *const c_char,
        account_name_length: u32,
        account_name: *const c_char,
        path_length: u32,
        path: *const c_char,
        port: u16,
        protocol: u32,
        authentication_type: u32,
        password_length: u32,
        password_data: *const c_void,
        item_ref: *mut SecKeychainItemRef,
    ) -> OsStatus;

    fn SecKeychainFindInternetPassword(
        keychain: *mut c_void,
        server_name_length: u32,
        server_name: *const c_char,
        security_domain_length: u32,
        security_domain: *const c_char,
        account_name_length: u32,
        account_name: *const c_char,
        path_length: u32,
        path: *const c_char,
        port: u16,
        protocol: u32,
        authentication_type: u32,
        password_length: *mut u32,
        password_data: *mut *mut c_void,
        item_ref: *mut SecKeychainItemRef,
    ) -> OsStatus;

    fn SecKeychainItemModifyContent(
        item_ref: SecKeychainItemRef,
        attr_list: *const SecKeychainAttributeList,
        length: u32,
        data: *const c_void,
    ) -> OsStatus;

    fn SecKeychainItemCopyContent(
        item_ref: SecKeychainItemRef,
        item_class: *mut u32,
        attr_list: *mut SecKeychainAttributeList,
        length: *mut u32,
        out_data: *mut *mut c_void,
    ) -> OsStatus;

    fn SecKeychainItemFreeContent(
        attr_list: *mut SecKeychainAttributeList,
        data: *mut c_void,
    ) -> OsStatus;

    fn SecKeychainItemDelete(item_ref: SecKeychainItemRef) -> OsStatus;

    fn SecItemCopyMatching(query: CFDictionaryRef, result: *mut CFTypeRef) -> OsStatus;

    fn SecCopyErrorMessageString(status: OsStatus, reserved: *mut c_void) -> CFStringRef;

    static kSecClass: CFStringRef;
    static kSecClassInternetPassword: CFStringRef;
    static kSecMatchLimit: CFStringRef;
    static kSecMatchLimitAll: CFStringRef;
    static kSecReturnAttributes: CFStringRef;
    static kSecAttrLabel: CFStringRef;
}

/// Render a platform status code to a human-readable message.
///
/// Falls back to the fixed "Unknown error" string when the platform's own
/// lookup fails.
#[must_use]
pub fn error_message(status: i32) -> String {
    // SAFETY: SecCopyErrorMessageString follows the create rule; the
    // returned CFString (if any) is owned here and released by the wrapper.
    let message_ref = unsafe { SecCopyErrorMessageString(status, ptr::null_mut()) };
    if message_ref.is_null() {
        return UNKNOWN_ERROR_MESSAGE.to_string();
    }
    // SAFETY: message_ref is a valid CFString obtained above under the
    // create rule; wrap_under_create_rule takes ownership.
    let message = unsafe { CFString::wrap_under_create_rule(message_ref) };
    message.to_string()
}

/// Turn a status code into `Ok(())` or the rendered `Security` error.
fn check(status: OsStatus) -> Result<()> {
    if status == ERR_SEC_SUCCESS {
        Ok(())
    } else {
        Err(Error::security(status, error_message(status)))
    }
}

/// Reject inputs whose byte length does not fit the platform's u32 lengths.
fn buffer_length(data: &str, what: &str) -> Result<u32> {
    u32::try_from(data.len()).map_err(|_| Error::invalid_input(format!("{what} is too long")))
}

/// Owned reference to a keychain item.
///
/// Releases the underlying CF object on drop.
///
/// # Thread Safety
///
/// This type is `!Send` and `!Sync` because keychain item references are
/// not thread-safe.
pub struct KeychainItem {
    item: SecKeychainItemRef,
    _not_send_sync: std::marker::PhantomData<*const ()>,
}

impl Drop for KeychainItem {
    fn drop(&mut self) {
        if !self.item.is_null() {
            // SAFETY: item is a valid keychain item reference obtained under
            // the create rule; releasing it exactly once here.
            unsafe {
                CFRelease(self.item.cast_const());
            }
        }
    }
}

impl KeychainItem {
    /// Set the human-readable label attribute on this item.
    ///
    /// # Errors
    ///
    /// Returns the rendered `Security` error if the modify call fails.
    pub fn set_label(&self, label: &str) -> Result<()> {
        let mut attribute = SecKeychainAttribute {
            tag: LABEL_ITEM_ATTR,
            length: buffer_length(label, "label")?,
            data: label.as_ptr().cast_mut().cast(),
        };
        let attrs = SecKeychainAttributeList {
            count: 1,
            attr: &mut attribute,
        };

        // SAFETY: the attribute list and the label bytes it points at live
        // for the duration of the call; the item reference is valid.
        let status = unsafe { SecKeychainItemModifyContent(self.item, &attrs, 0, ptr::null()) };
        check(status)
    }

    /// Copy the account attribute of this item.
    ///
    /// # Errors
    ///
    /// Returns the rendered `Security` error if the copy call fails.
    pub fn account(&self) -> Result<String> {
        let mut attribute = SecKeychainAttribute {
            tag: ACCOUNT_ITEM_ATTR,
            length: 0,
            data: ptr::null_mut(),
        };
        let mut list = SecKeychainAttributeList {
            count: 1,
            attr: &mut attribute,
        };

        // SAFETY: the item reference is valid; on success the platform fills
        // attribute.data/length with keychain-owned memory.
        let status = unsafe {
            SecKeychainItemCopyContent(
                self.item,
                ptr::null_mut(),
                &mut list,
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        check(status)?;

        // SAFETY: on success attribute.data points at attribute.length bytes
        // owned by the keychain; copied out before the release below.
        let account = unsafe {
            let bytes =
                std::slice::from_raw_parts(attribute.data.cast::<u8>(), attribute.length as usize);
            String::from_utf8_lossy(bytes).into_owned()
        };

        // SAFETY: list was filled by SecKeychainItemCopyContent above and
        // must be released through SecKeychainItemFreeContent exactly once.
        unsafe {
            SecKeychainItemFreeContent(&mut list, ptr::null_mut());
        }

        Ok(account)
    }
}

/// Insert a new internet-password item for the server key.
///
/// Returns the created item so the caller can set its label, or delete it
/// again if a follow-up step fails.
///
/// # Errors
///
/// Returns the rendered `Security` error if the insert fails (including
/// `errSecDuplicateItem` for an existing record).
pub fn add_internet_password(server: &Server, username: &str, secret: &str) -> Result<KeychainItem> {
    let host_len = buffer_length(server.host(), "host")?;
    let path_len = buffer_length(server.path(), "path")?;
    let username_len = buffer_length(username, "username")?;
    let secret_len = buffer_length(secret, "secret")?;

    let mut item: SecKeychainItemRef = ptr::null_mut();

    // SAFETY: every pointer/length pair references a live Rust string for
    // the duration of the call; the returned item follows the create rule
    // and is owned by the wrapper.
    let status = unsafe {
        SecKeychainAddInternetPassword(
            ptr::null_mut(),
            host_len,
            server.host().as_ptr().cast(),
            0,
            ptr::null(),
            username_len,
            username.as_ptr().cast(),
            path_len,
            server.path().as_ptr().cast(),
            server.port(),
            server.protocol().code(),
            AUTHENTICATION_TYPE_DEFAULT,
            secret_len,
            secret.as_ptr().cast(),
            &mut item,
        )
    };
    check(status)?;

    Ok(KeychainItem {
        item,
        _not_send_sync: std::marker::PhantomData,
    })
}

/// Look up the item matching the server key without copying its secret.
///
/// # Errors
///
/// Returns the rendered `Security` error if the lookup fails (including
/// `errSecItemNotFound`).
pub fn find_internet_password_item(server: &Server) -> Result<KeychainItem> {
    let host_len = buffer_length(server.host(), "host")?;
    let path_len = buffer_length(server.path(), "path")?;

    let mut item: SecKeychainItemRef = ptr::null_mut();

    // SAFETY: pointer/length pairs reference live Rust strings; passing null
    // password out-params skips copying the secret; the returned item
    // follows the create rule and is owned by the wrapper.
    let status = unsafe {
        SecKeychainFindInternetPassword(
            ptr::null_mut(),
            host_len,
            server.host().as_ptr().cast(),
            0,
            ptr::null(),
            0,
            ptr::null(),
            path_len,
            server.path().as_ptr().cast(),
            server.port(),
            server.protocol().code(),
            AUTHENTICATION_TYPE_DEFAULT,
            ptr::null_mut(),
            ptr::null_mut(),
            &mut item,
        )
    };
    check(status)?;

    Ok(KeychainItem {
        item,
        _not_send_sync: std::marker::PhantomData,
    })
}

/// Look up the item matching the server key and copy its secret content.
///
/// # Errors
///
/// Returns the rendered `Security` error if the lookup fails (including
/// `errSecItemNotFound`).
pub fn find_internet_password(server: &Server) -> Result<(String, KeychainItem)> {
    let host_len = buffer_length(server.host(), "host")?;
    let path_len = buffer_length(server.path(), "path")?;

    let mut secret_len: u32 = 0;
    let mut secret_data: *mut c_void = ptr::null_mut();
    let mut item: SecKeychainItemRef = ptr::null_mut();

    // SAFETY: pointer/length pairs reference live Rust strings; on success
    // the platform fills the password out-params with keychain-owned memory
    // and the returned item follows the create rule.
    let status = unsafe {
        SecKeychainFindInternetPassword(
            ptr::null_mut(),
            host_len,
            server.host().as_ptr().cast(),
            0,
            ptr::null(),
            0,
            ptr::null(),
            path_len,
            server.path().as_ptr().cast(),
            server.port(),
            server.protocol().code(),
            AUTHENTICATION_TYPE_DEFAULT,
            &mut secret_len,
            &mut secret_data,
            &mut item,
        )
    };
    check(status)?;

    let item = KeychainItem {
        item,
        _not_send_sync: std::marker::PhantomData,
    };

    // SAFETY: on success secret_data points at secret_len bytes owned by
    // the keychain; copied out, then released exactly once below.
    let secret = unsafe {
        let bytes = std::slice::from_raw_parts(secret_data.cast::<u8>(), secret_len as usize);
        let owned = String::from_utf8_lossy(bytes).into_owned();
        SecKeychainItemFreeContent(ptr::null_mut(), secret_data);
        owned
    };

    Ok((secret, item))
}

/// Delete an item from the keychain.
///
/// # Errors
///
/// Returns the rendered `Security` error if deletion fails.
pub fn delete_item(item: &KeychainItem) -> Result<()> {
    // SAFETY: the item reference is valid for the duration of the call.
    let status = unsafe { SecKeychainItemDelete(item.item) };
    check(status)
}

/// Query all internet-password items carrying the given label and return
/// their raw attributes.
///
/// # Errors
///
/// Returns the rendered `Security` error if the query fails (including
/// `errSecItemNotFound` when nothing matches).
pub fn copy_matching_internet_passwords(label: &str) -> Result<Vec<ItemAttributes>> {
    let label_cf = CFString::new(label);

    // SAFETY: the kSec* statics are process-lifetime CFString constants
    // exported by Security.framework; wrapping under the get rule retains
    // them for the dictionary's lifetime.
    let query = unsafe {
        CFDictionary::from_CFType_pairs(&[
            (
                CFString::wrap_under_get_rule(kSecClass),
                CFType::wrap_under_get_rule(kSecClassInternetPassword.cast()),
            ),
            (
                CFString::wrap_under_get_rule(kSecReturnAttributes),
                CFBoolean::true_value().as_CFType(),
            ),
            (
                CFString::wrap_under_get_rule(kSecMatchLimit),
                CFType::wrap_under_get_rule(kSecMatchLimitAll.cast()),
            ),
            (
                CFString::wrap_under_get_rule(kSecAttrLabel),
                label_cf.as_CFType(),
            ),
        ])
    };

    let mut result: CFTypeRef = ptr::null();

    // SAFETY: the query dictionary is valid for the duration of the call;
    // on success the result follows the create rule.
    let status = unsafe { SecItemCopyMatching(query.as_concrete_TypeRef(), &mut result) };
    check(status)?;

    if result.is_null() {
        return Ok(Vec::new());
    }

    // SAFETY: with kSecReturnAttributes and kSecMatchLimitAll the result is
    // a CFArray of attribute CFDictionaries; wrap takes ownership.
    let items: CFArray<CFDictionary<CFString, CFType>> =
        unsafe { CFArray::wrap_under_create_rule(result.cast()) };

    let mut attributes = Vec::with_capacity(items.len().unsigned_abs());
    for item in items.iter() {
        attributes.push(read_item_attributes(&item));
    }
    Ok(attributes)
}

/// Pull the fields `list` needs out of one attribute dictionary.
fn read_item_attributes(dict: &CFDictionary<CFString, CFType>) -> ItemAttributes {
    ItemAttributes {
        protocol: string_attribute(dict, ATTR_KEY_PROTOCOL),
        server: string_attribute(dict, ATTR_KEY_SERVER),
        path: string_attribute(dict, ATTR_KEY_PATH),
        port: number_attribute(dict, ATTR_KEY_PORT),
        account: string_attribute(dict, ATTR_KEY_ACCOUNT),
    }
}

fn string_attribute(dict: &CFDictionary<CFString, CFType>, key: &'static str) -> Option<String> {
    let cf_key = CFString::from_static_string(key);
    dict.find(&cf_key)
        .and_then(|value| value.downcast::<CFString>())
        .map(|value| value.to_string())
}

fn number_attribute(dict: &CFDictionary<CFString, CFType>, key: &'static str) -> Option<i64> {
    let cf_key = CFString::from_static_string(key);
    dict.find(&cf_key)
        .and_then(|value| value.downcast::<CFNumber>())
        .and_then(|value| value.to_i64())
}
