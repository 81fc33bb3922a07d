//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

error_chain!{

    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error);
        Cairo(::cairo::Error);
        CairoBorrow(::cairo::BorrowError);
        Image(::image::ImageError);
    }

    errors {

        // caller passed something we refuse to silently correct
        InvalidArgument(what: String) {
            description("invalid argument")
            display("invalid argument: {}", what)
        }

        // ran out of room for a mesh or a surface
        ResourceExhaustion(what: String) {
            description("resource exhaustion")
            display("resource exhaustion: {}", what)
        }

    }

}

// shorthand for bailing out on a bad argument
macro_rules! invalid_argument {
    ($($arg:tt)*) => (
        bail!($crate::errors::ErrorKind::InvalidArgument(format!($($arg)*)))
    )
}
