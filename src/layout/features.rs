/// Event fields a layout needs in order to render
use bitflags::bitflags;

bitflags! {
    /// Capability advertisement for layouts and converter chains.
    ///
    /// Some event fields are expensive to capture (call-site location) or
    /// involve extra lookups (diagnostic contexts). A chain advertises the
    /// union of what its converters read so the caller can skip capturing
    /// anything nobody will render.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LayoutFeatures: u32 {
        const LOCATION = 1;
        const MDC = 2;
        const NDC = 4;
        const THROWABLE = 8;
    }
}
