use super::Shell;

pub struct Zsh;

impl Shell for Zsh {
    fn template(&self) -> &'static str {
        r#"
__jmp_track() {
    jmp visit "${PWD}"
}

autoload -Uz add-zsh-hook
add-zsh-hook chpwd __jmp_track

jmp_cd() {
    if [ "$#" -eq 0 ]; then jmp view; return $?; fi
    local res
    res="$(%EXT_ENV%=1 jmp jump "$@")"
    local ret=$?
    case $ret in
    %SUCCESS%) echo "${res}";;
    %SUCCESS_DIR%) cd "${res}";;
    %ERROR%) echo "${res}" && return 1;;
    %ERROR_NO_INPUT%) return 1;;
    *) echo "${res}" && return $ret;;
    esac
}
alias z='jmp_cd'
"#
    }
}
