//! Windows Installer glue: the exported custom action and the native
//! collaborators it runs with.

use std::borrow::Cow;
use std::path::Path;

use windows::core::{s, w, HSTRING, PCWSTR, PWSTR};
use windows::Win32::Foundation::{FreeLibrary, HMODULE, HWND};
use windows::Win32::System::ApplicationInstallationAndServicing::{MsiGetPropertyW, MSIHANDLE};
use windows::Win32::System::LibraryLoader::{
    FindResourceW, GetModuleHandleExW, GetProcAddress, LoadLibraryW, LoadResource, LockResource,
    SizeofResource, GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS,
    GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
};
use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_OK};

use super::{
    ActionStatus, Manifest, Notifier, Phase, Platform, PropertyStore, ResourceSource, SetupAction,
    SetupRunner,
};
use crate::error::{InteropError, Result};
use crate::result::{self, ResultCode};

const ERROR_MORE_DATA: u32 = 234;
const DSETUP_DIRECTX: u32 = 0x0001_0018;

/// Properties of the running installer session.
pub struct MsiSession(pub MSIHANDLE);

impl PropertyStore for MsiSession {
    fn property(&self, name: &str) -> Option<String> {
        let name = HSTRING::from(name);
        let mut empty = [0u16; 1];
        let mut len = 0u32;
        let rc = unsafe {
            MsiGetPropertyW(self.0, &name, Some(PWSTR(empty.as_mut_ptr())), Some(&mut len as *mut u32))
        };
        if rc != 0 && rc != ERROR_MORE_DATA {
            return None;
        }

        let mut buf = vec![0u16; len as usize + 1];
        let mut len = buf.len() as u32;
        let rc = unsafe {
            MsiGetPropertyW(self.0, &name, Some(PWSTR(buf.as_mut_ptr())), Some(&mut len as *mut u32))
        };
        (rc == 0).then(|| String::from_utf16_lossy(&buf[..len as usize]))
    }
}

/// `BINARY` resources linked into a module.
pub struct ModuleResources {
    module: HMODULE,
}

impl ModuleResources {
    pub fn new(module: HMODULE) -> Self {
        Self { module }
    }

    /// Resources of the module containing this code.
    pub fn current() -> Result<Self> {
        let mut module = HMODULE::default();
        unsafe {
            GetModuleHandleExW(
                GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
                PCWSTR(DXSetupAction as *const () as *const u16),
                &mut module,
            )?;
        }
        Ok(Self { module })
    }
}

impl ResourceSource for ModuleResources {
    fn resource(&self, id: u16) -> Option<Cow<'_, [u8]>> {
        unsafe {
            let info = FindResourceW(Some(self.module), PCWSTR(id as usize as *const u16), w!("BINARY"));
            if info.is_invalid() {
                return None;
            }
            let global = LoadResource(Some(self.module), info).ok()?;
            let data = LockResource(global) as *const u8;
            let size = SizeofResource(Some(self.module), info) as usize;
            if data.is_null() || size == 0 {
                return None;
            }
            // Resource memory lives as long as the module is loaded.
            Some(Cow::Borrowed(std::slice::from_raw_parts(data, size)))
        }
    }
}

/// Shows each notification in a message box.
pub struct MessageBoxNotifier;

impl Notifier for MessageBoxNotifier {
    fn notify(&self, phase: Phase, message: &str) {
        let caption = match phase {
            Phase::ReadDirectory => "Installing to...",
            Phase::Failed => "Failed",
            _ => "Update",
        };
        unsafe {
            MessageBoxW(None, &HSTRING::from(message), &HSTRING::from(caption), MB_OK);
        }
    }
}

type DirectXSetupFn = unsafe extern "system" fn(HWND, PWSTR, u32) -> i32;

/// Runs `DirectXSetupW` from the extracted `dsetup.dll`.
pub struct DirectXSetup;

impl SetupRunner for DirectXSetup {
    fn run(&self, directory: &Path) -> Result<()> {
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(directory)?;
        let outcome = unsafe { invoke_setup() };
        std::env::set_current_dir(previous)?;
        outcome
    }
}

unsafe fn invoke_setup() -> Result<()> {
    let module = LoadLibraryW(w!("dsetup.dll"))?;
    let outcome = match GetProcAddress(module, s!("DirectXSetupW")) {
        Some(proc) => {
            let setup: DirectXSetupFn = std::mem::transmute(proc);
            result::check_with(setup(HWND::default(), PWSTR::null(), DSETUP_DIRECTX), "DirectXSetupW")
                .map(|_| ())
        }
        None => Err(InteropError::Native {
            result: ResultCode::NOT_IMPLEMENTED,
            description: Some("dsetup.dll does not export DirectXSetupW".into()),
        }),
    };
    let _ = FreeLibrary(module);
    outcome
}

/// Custom action entry point called by Windows Installer.
#[no_mangle]
pub extern "system" fn DXSetupAction(session: MSIHANDLE) -> u32 {
    let resources = match ModuleResources::current() {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Cannot locate embedded resources: {e}");
            return ActionStatus::Failure.msi_code();
        }
    };
    let manifest = Manifest::directx_redist(Platform::current());
    let properties = MsiSession(session);

    let mut action = SetupAction::new(&manifest, &properties, &resources);
    action.setup = &DirectXSetup;
    action.notifier = &MessageBoxNotifier;
    action.run().msi_code()
}
