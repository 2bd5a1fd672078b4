fn main() {
    // Host builds need no codegen; ESP-IDF builds forward the sysenv
    // so esp-idf-sys can locate the toolchain.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
