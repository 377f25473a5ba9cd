use std::io;

#[derive(Clone, Copy, Debug)]
pub enum SignalType {
    Interrupt,
    Kill,
    Terminate,
}

#[cfg(unix)]
pub fn kill(pid: u32, signal: SignalType) -> io::Result<()> {
    let result = unsafe {
        libc::kill(
            pid as i32,
            match signal {
                SignalType::Interrupt => libc::SIGINT,
                SignalType::Kill => libc::SIGKILL,
                SignalType::Terminate => libc::SIGTERM,
            },
        )
    };

    if result != 0 {
        let error = io::Error::last_os_error();

        // "No such process" error, so it may have been killed already
        if error.raw_os_error().is_some_and(|code| code == libc::ESRCH) {
            return Ok(());
        }

        return Err(error);
    }

    Ok(())
}
