#[unsafe(no_mangle)]
/// ### English
/// Returns the C ABI version.
///
/// ### 中文
/// 返回 C ABI 版本号。
pub extern "C" fn boram_plugin_abi_version() -> u32 {
    super::BORAM_PLUGIN_ABI_VERSION
}
