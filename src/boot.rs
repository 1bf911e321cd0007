//! `release_patch` never calls into this module. It documents the
//! collaborator a bootloader wires up after a successful patch: validating
//! and transferring control to the freshly-patched application image.

/// Validates and transfers control to the application at `app_base`.
///
/// A real implementation reads the initial stack pointer at `app_base`
/// and the reset vector at `app_base + 4`, checks both lie in plausible
/// flash/RAM regions for the target, disables interrupts, resets
/// peripheral clocks and NVIC state, sets the main stack pointer, and
/// branches to the reset vector. `jump` never returns on success; on
/// validation failure it should return so the caller can fall back to
/// recovery.
pub trait BootJumper {
    /// # Safety
    ///
    /// `app_base` must point at a flash region holding a valid vector
    /// table for the target; calling this with an unvalidated or
    /// partially-patched image is undefined behaviour by construction
    /// (it reprograms the stack pointer and branches into arbitrary code).
    unsafe fn jump(self, app_base: u32) -> !;
}

/// Reference [`BootJumper`] for Cortex-M targets. Ships off by default
/// (`cortex-m-jump` feature) since it is not exercised by the patch engine
/// itself and pulls in `cortex-m`.
#[cfg(feature = "cortex-m-jump")]
pub struct CortexMJumper;

#[cfg(feature = "cortex-m-jump")]
impl BootJumper for CortexMJumper {
    unsafe fn jump(self, app_base: u32) -> ! {
        // Vector table layout: word 0 is the initial stack pointer, word 1
        // the reset vector (Thumb bit set).
        let vector_table = app_base as *const u32;
        let initial_sp = unsafe { core::ptr::read(vector_table) };
        let reset_vector = unsafe { core::ptr::read(vector_table.add(1)) };

        cortex_m::interrupt::disable();

        // Relocate the vector table base before handing off control so the
        // application's own interrupt vectors take effect.
        unsafe {
            let scb = &mut *(cortex_m::peripheral::SCB::PTR as *mut cortex_m::peripheral::scb::RegisterBlock);
            scb.vtor.write(app_base);
        }

        cortex_m::asm::dsb();
        cortex_m::asm::isb();

        unsafe {
            cortex_m::register::msp::write(initial_sp);
            let entry: extern "C" fn() -> ! = core::mem::transmute(reset_vector);
            entry()
        }
    }
}
