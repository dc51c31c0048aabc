//! Builtin modules reachable through `import`.

use crate::prelude::*;

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("node");

    // =========================================================================
    // fs
    // =========================================================================

    let fs = builtin(BuiltinModule::Fs);
    m.function(fs, "readFileSync", &[STR, ANY], ANY).optional(1);
    m.function(fs, "writeFileSync", &[STR, ANY, ANY], VOID).optional(1);
    m.function(fs, "appendFileSync", &[STR, ANY, ANY], VOID).optional(1);
    m.function(fs, "existsSync", &[STR], BOOL);
    m.function(fs, "mkdirSync", &[STR, ANY], VOID).optional(1);
    m.function(fs, "rmSync", &[STR, ANY], VOID).optional(1);
    m.function(fs, "unlinkSync", &[STR], VOID);
    m.function(fs, "renameSync", &[STR, STR], VOID);
    m.function(fs, "copyFileSync", &[STR, STR], VOID);
    m.function(fs, "statSync", &[STR], PTR);
    m.function(fs, "readdirSync", &[STR, ANY], PTR)
        .optional(1)
        .tagged(ResultTag::RuntimeArray);
    m.function(fs, "readFile", &[STR, ANY], PTR)
        .optional(1)
        .tagged(ResultTag::Promise);
    m.function(fs, "writeFile", &[STR, ANY, ANY], PTR)
        .optional(1)
        .tagged(ResultTag::Promise);

    // =========================================================================
    // path
    // =========================================================================

    let path = builtin(BuiltinModule::Path);
    for op in ["join", "resolve"] {
        m.function(path, op, &[], STR).variadic();
    }
    for op in ["dirname", "extname", "normalize"] {
        m.function(path, op, &[STR], STR);
    }
    m.function(path, "basename", &[STR, STR], STR).optional(1);
    m.function(path, "relative", &[STR, STR], STR);
    m.function(path, "isAbsolute", &[STR], BOOL);
    m.function(path, "parse", &[STR], PTR);
    m.function(path, "format", &[PTR], STR);

    // =========================================================================
    // os
    // =========================================================================

    let os = builtin(BuiltinModule::Os);
    for op in ["platform", "arch", "homedir", "tmpdir", "hostname", "type", "release"] {
        m.function(os, op, &[], STR);
    }
    for op in ["totalmem", "freemem", "uptime"] {
        m.function(os, op, &[], F64);
    }
    m.function(os, "cpus", &[], PTR).tagged(ResultTag::RuntimeArray);

    // =========================================================================
    // util, crypto, events
    // =========================================================================

    let util = builtin(BuiltinModule::Util);
    m.function(util, "format", &[STR], STR).variadic();
    m.function(util, "inspect", &[ANY, ANY], STR).optional(1);
    m.function(util, "isDeepStrictEqual", &[ANY, ANY], BOOL);
    m.function(util, "promisify", &[PTR], PTR);

    let crypto = builtin(BuiltinModule::Crypto);
    m.function(crypto, "randomUUID", &[], STR);
    m.function(crypto, "randomInt", &[F64, F64], F64).optional(1);
    m.function(crypto, "randomBytes", &[F64], PTR)
        .tagged(ResultTag::TypedArray(TypedArrayKind::Uint8));
    m.function(crypto, "createHash", &[STR], PTR);

    let events = builtin(BuiltinModule::Events);
    m.function(events, "once", &[PTR, STR], PTR).tagged(ResultTag::Promise);

    // =========================================================================
    // child_process, url, zlib
    // =========================================================================

    let child = builtin(BuiltinModule::ChildProcess);
    m.function(child, "execSync", &[STR, ANY], ANY).optional(1);
    m.function(child, "spawnSync", &[STR, PTR, ANY], PTR).optional(2);

    let url = builtin(BuiltinModule::Url);
    m.function(url, "fileURLToPath", &[ANY], STR);
    m.function(url, "pathToFileURL", &[STR], PTR);

    let zlib = builtin(BuiltinModule::Zlib);
    for op in ["gzipSync", "gunzipSync", "deflateSync", "inflateSync"] {
        m.function(zlib, op, &[ANY, ANY], PTR)
            .optional(1)
            .tagged(ResultTag::TypedArray(TypedArrayKind::Uint8));
    }

    // =========================================================================
    // assert, process
    // =========================================================================

    let assert = builtin(BuiltinModule::Assert);
    m.function(assert, "ok", &[ANY, STR], VOID).optional(1);
    for op in ["equal", "notEqual", "strictEqual", "notStrictEqual", "deepStrictEqual"] {
        m.function(assert, op, &[ANY, ANY, STR], VOID).optional(1);
    }
    m.function(assert, "throws", &[PTR, ANY], VOID).optional(1);

    let process = builtin(BuiltinModule::Process);
    m.function(process, "exit", &[F64], VOID).optional(1);
    m.function(process, "cwd", &[], STR);
    m.function(process, "nextTick", &[PTR], VOID).variadic();
    m.function(process, "hrtime", &[PTR], PTR).optional(1);
    m.function(process, "memoryUsage", &[], PTR);

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_registry::AbiTable;

    #[test]
    fn module_symbols_use_specifier_stem() {
        let mut table = AbiTable::new();
        table.install(module()).unwrap();
        let read = table
            .lookup(builtin(BuiltinModule::Fs), "readFileSync")
            .unwrap();
        assert_eq!(read.symbol, "kestrel_fs_read_file_sync");
        let exec = table
            .lookup(builtin(BuiltinModule::ChildProcess), "execSync")
            .unwrap();
        assert_eq!(exec.symbol, "kestrel_child_process_exec_sync");
    }
}
