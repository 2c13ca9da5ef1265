use super::Shell;

pub struct Bash;

impl Shell for Bash {
    fn template(&self) -> &'static str {
        // PROMPT_COMMAND modification inspired by fasd's hook installation.
        r#"
__jmp_track() {
    if [[ "${__JMP_LAST_PWD}" != "${PWD}" ]]; then
        jmp visit "${PWD}"
    fi
    __JMP_LAST_PWD="${PWD}"
}

case $PROMPT_COMMAND in
    *__jmp_track\;*) ;;
    *) PROMPT_COMMAND="__jmp_track;$PROMPT_COMMAND" ;;
esac

jmp_cd() {
    if [ "$#" -eq 0 ]; then jmp view; return $?; fi
    local res
    # 'local res' is declared separately: 'local' clobbers the command's
    # return code.
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
